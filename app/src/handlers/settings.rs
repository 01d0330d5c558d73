use super::{HandlerResult, warn_unsaved};
use clap::Subcommand;
use common::AppState;
use settings::{Settings, SettingsPatch, Theme};

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Print the current settings
    Show,
    /// Change one or more settings; the whole change is rejected if any value is invalid
    Set {
        #[arg(long)]
        base_currency: Option<String>,
        #[arg(long)]
        budget_cap: Option<f64>,
        #[arg(long)]
        alt1_symbol: Option<String>,
        #[arg(long)]
        alt1_rate: Option<f64>,
        #[arg(long)]
        alt2_symbol: Option<String>,
        #[arg(long)]
        alt2_rate: Option<f64>,
    },
    /// Restore the default settings
    Reset,
}

fn print_settings(settings: &Settings) {
    println!("Base currency: {}", settings.base_currency);
    println!("Budget cap:    {}", settings.budget_cap);
    println!("Alt currency:  {} at {}", settings.alt1_symbol, settings.alt1_rate);
    println!("Alt currency:  {} at {}", settings.alt2_symbol, settings.alt2_rate);
    println!("Theme:         {}", settings.theme);
}

pub fn run(state: &mut AppState, action: SettingsCommand) -> HandlerResult {
    match action {
        SettingsCommand::Show => print_settings(&state.settings.get()),
        SettingsCommand::Set {
            base_currency,
            budget_cap,
            alt1_symbol,
            alt1_rate,
            alt2_symbol,
            alt2_rate,
        } => {
            let patch = SettingsPatch {
                base_currency,
                budget_cap,
                alt1_symbol,
                alt1_rate,
                alt2_symbol,
                alt2_rate,
                theme: None,
            };
            if patch.is_empty() {
                return Err("nothing to change".into());
            }
            let updated = state.settings.update(&patch)?;
            warn_unsaved(updated.saved);
            print_settings(&updated.value);
        }
        SettingsCommand::Reset => {
            let reset = state.settings.reset();
            warn_unsaved(reset.saved);
            print_settings(&reset.value);
        }
    }
    Ok(())
}

pub fn theme(state: &mut AppState, mode: Option<&str>) -> HandlerResult {
    let changed = match mode {
        None => {
            println!("{}", state.settings.theme());
            return Ok(());
        }
        Some("toggle") => state.settings.toggle_theme(),
        Some(value) => state.settings.set_theme(value.parse::<Theme>()?),
    };
    warn_unsaved(changed.saved);
    println!("{}", changed.value);
    Ok(())
}
