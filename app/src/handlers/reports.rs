use super::HandlerResult;
use common::AppState;
use settings::Currency;

pub fn stats(state: &AppState) -> HandlerResult {
    let stats = state.records.stats();
    let settings = state.settings.get();

    println!("Records:     {}", stats.total_records);
    println!(
        "Total spent: {}  ({} / {})",
        settings.display(stats.total_spent, Currency::Base),
        settings.display(stats.total_spent, Currency::Alt1),
        settings.display(stats.total_spent, Currency::Alt2)
    );
    println!("Average:     {}", settings.display(stats.avg_spent, Currency::Base));
    println!(
        "Top category by count:  {}",
        stats.top_category_by_count.as_deref().unwrap_or("-")
    );
    println!(
        "Top category by amount: {}",
        stats.top_category_by_amount.as_deref().unwrap_or("-")
    );

    for (category, amount) in &stats.category_amounts {
        let count = stats.category_counts.get(category).copied().unwrap_or(0);
        println!(
            "  {:<13} {:>4} x  {:>12}",
            category,
            count,
            settings.display(*amount, Currency::Base)
        );
    }
    Ok(())
}

pub fn trend(state: &AppState) -> HandlerResult {
    let trend = state.records.seven_day_trend(state.today());
    let settings = state.settings.get();

    for (label, amount) in trend.labels.iter().zip(&trend.amounts) {
        println!("{:<7} {:>12}", label, settings.display(*amount, Currency::Base));
    }
    Ok(())
}

pub fn budget(state: &AppState) -> HandlerResult {
    let info = state.budget_info();
    let settings = state.settings.get();

    println!("Budget cap: {}", settings.display(info.budget_cap, Currency::Base));
    println!(
        "Spent:      {} ({:.1}%)",
        settings.display(info.total_spent, Currency::Base),
        info.percent_used
    );
    if info.is_over_budget {
        println!("Over budget by {}", settings.display(info.remaining, Currency::Base));
    } else {
        println!("Remaining:  {}", settings.display(info.remaining, Currency::Base));
    }
    Ok(())
}
