use super::{HandlerResult, warn_unsaved};
use crate::{RecordArgs, UpdateArgs};
use common::AppState;
use records::transfer::export_file_name;
use records::{
    RawRecordFields, Record, RecordEdit, SortDirection, SortKey, SortOrder, ValidationReport,
};
use settings::format_money;
use std::fs;
use std::path::{Path, PathBuf};

/// Turns stored, entity-escaped text back into what the user typed, for terminal output.
fn decode_entities(text: &str) -> String {
    text.replace("&#x2F;", "/")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&gt;", ">")
        .replace("&lt;", "<")
        .replace("&amp;", "&")
}

fn print_report(report: &ValidationReport) {
    for (field, message) in &report.errors {
        eprintln!("error: {}: {}", field, message);
    }
    print_warnings(report.warnings.values());
}

fn print_warnings<'a>(warnings: impl IntoIterator<Item = &'a String>) {
    for message in warnings {
        eprintln!("warning: {}", message);
    }
}

fn print_record(state: &AppState, record: &Record, description: &str) {
    let symbol = state.settings.get().base_currency;
    println!(
        "{}  {:>12}  {:<13}  {}  [{}]",
        record.date,
        format_money(&symbol, record.amount),
        record.category,
        description,
        record.id
    );
}

fn print_records(state: &AppState, records: &[Record]) {
    if records.is_empty() {
        println!("No records.");
        return;
    }
    for record in records {
        print_record(state, record, &decode_entities(&record.description));
    }
}

pub fn add(state: &mut AppState, args: RecordArgs) -> HandlerResult {
    let raw = RawRecordFields {
        description: args.description,
        amount: args.amount,
        category: args.category,
        date: args
            .date
            .unwrap_or_else(|| state.today().format("%Y-%m-%d").to_string()),
    };

    let accepted = match state.validator().accept(&raw) {
        Ok(accepted) => accepted,
        Err(report) => {
            print_report(&report);
            return Err("record not saved".into());
        }
    };
    print_warnings(accepted.warnings.values());

    let added = state.records.add(&accepted.input);
    warn_unsaved(added.saved);
    println!("Added {}", added.value.id);
    Ok(())
}

pub fn update(state: &mut AppState, id: &str, fields: UpdateArgs) -> HandlerResult {
    let current = state
        .records
        .find_by_id(id)
        .ok_or_else(|| format!("Record not found: {}", id))?;

    let edit = RecordEdit {
        description: fields.description,
        amount: fields.amount,
        category: fields.category,
        date: fields.date,
    };

    let accepted = match state.validator().accept_edit(&current, &edit) {
        Ok(accepted) => accepted,
        Err(report) => {
            print_report(&report);
            return Err("record not updated".into());
        }
    };
    print_warnings(accepted.warnings.values());

    let updated = state.records.update(id, &accepted.input)?;
    warn_unsaved(updated.saved);
    println!("Updated {}", updated.value.id);
    Ok(())
}

pub fn delete(state: &mut AppState, id: &str) -> HandlerResult {
    let removed = state.records.delete(id)?;
    warn_unsaved(removed.saved);
    println!("Deleted {} ({})", removed.value.id, decode_entities(&removed.value.description));
    Ok(())
}

pub fn show(state: &AppState, id: &str) -> HandlerResult {
    let record = state
        .records
        .find_by_id(id)
        .ok_or_else(|| format!("Record not found: {}", id))?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

pub fn list(state: &AppState, pattern: Option<&str>, case_sensitive: bool) -> HandlerResult {
    let matcher = match pattern {
        Some(p) => {
            let matcher = search::compile(p, case_sensitive);
            if matcher.is_none() {
                eprintln!("warning: {} Showing all records.", search::validate(p).message);
            }
            matcher
        }
        None => None,
    };

    print_records(state, &state.records.filter(matcher.as_ref()));
    Ok(())
}

pub fn search(state: &AppState, pattern: &str, case_sensitive: bool, highlight: bool) -> HandlerResult {
    let Some(matcher) = search::compile(pattern, case_sensitive) else {
        return Err(search::validate(pattern).message.into());
    };

    let found = state.records.search(Some(&matcher));
    if found.is_empty() {
        println!("No records match /{}/.", matcher.source());
        return Ok(());
    }

    for record in &found {
        let description = decode_entities(&record.description);
        let description = if highlight {
            search::highlight(&description, Some(&matcher))
        } else {
            description
        };
        print_record(state, record, &description);
    }
    println!("{} of {} records match.", found.len(), state.records.len());
    Ok(())
}

pub fn check_pattern(pattern: &str) -> HandlerResult {
    let check = search::validate(pattern);
    println!("{}", check.message);
    if check.valid {
        Ok(())
    } else {
        Err("invalid pattern".into())
    }
}

pub fn sort(state: &mut AppState, key: SortKey, direction: SortDirection) -> HandlerResult {
    let order = state.records.set_sort(SortOrder::new(key, direction));
    warn_unsaved(order.saved);
    println!("Sorted by {} {}", order.value.key, order.value.direction);
    Ok(())
}

pub fn import(state: &mut AppState, file: &Path) -> HandlerResult {
    let json = fs::read_to_string(file)?;
    let imported = state.records.import_json(&json)?;
    warn_unsaved(imported.saved);
    println!("Imported {} records from {}", imported.value, file.display());
    Ok(())
}

pub fn export(state: &AppState, out: Option<PathBuf>) -> HandlerResult {
    let path = out.unwrap_or_else(|| PathBuf::from(export_file_name(state.today())));
    fs::write(&path, state.records.export_json()?)?;
    println!("Exported {} records to {}", state.records.len(), path.display());
    Ok(())
}

pub fn clear(state: &mut AppState) -> HandlerResult {
    let cleared = state.records.clear();
    warn_unsaved(cleared.saved);
    println!("Removed {} records", cleared.value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_entities_inverts_sanitize() {
        let stored = records::validation::sanitize("Tom & Jerry's <b>/ \"pizza\"");
        assert_eq!(decode_entities(&stored), "Tom & Jerry's b/ \"pizza\"");
    }
}
