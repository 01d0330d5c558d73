//! JSON import/export of the whole record collection.

use crate::models::Record;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

pub const STRUCTURE_MESSAGE: &str =
    "Each record needs an id, a text description, a numeric amount, a date and a category.";

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Import file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Import file must contain a JSON array of records.")]
    NotAnArray,
    #[error("Invalid record at position {index}. {}", STRUCTURE_MESSAGE)]
    InvalidRecord { index: usize },
}

/// JavaScript-style truthiness, used for the required import fields.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    value?.as_str()?.parse().ok()
}

fn to_record(index: usize, value: &Value, now: DateTime<Utc>) -> Result<Record, ImportError> {
    let invalid = || ImportError::InvalidRecord { index };
    let object = value.as_object().ok_or_else(invalid)?;

    let well_formed = truthy(object.get("id"))
        && object.get("description").is_some_and(Value::is_string)
        && object.get("amount").is_some_and(Value::is_number)
        && truthy(object.get("date"))
        && truthy(object.get("category"));
    if !well_formed {
        return Err(invalid());
    }

    let created_at = timestamp(object.get("createdAt")).unwrap_or(now);
    Ok(Record {
        id: text(&object["id"]),
        description: text(&object["description"]),
        amount: object["amount"].as_f64().ok_or_else(invalid)?,
        category: text(&object["category"]),
        date: text(&object["date"]),
        created_at,
        updated_at: timestamp(object.get("updatedAt")).unwrap_or(created_at),
    })
}

/// Parses an import file. Any malformed element rejects the whole batch.
pub fn parse_import(json: &str, now: DateTime<Utc>) -> Result<Vec<Record>, ImportError> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(ImportError::NotAnArray);
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| to_record(index, item, now))
        .collect()
}

pub fn export_json(records: &[Record]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

pub fn export_file_name(today: NaiveDate) -> String {
    format!("finance-records-{}.json", today.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_record() {
        let now = Utc::now();
        let records = parse_import(
            r#"[{"id":"a","description":"x","amount":5,"date":"2024-01-01","category":"Food"}]"#,
            now,
        )
        .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, "x");
        assert_eq!(records[0].created_at, now);
        assert_eq!(records[0].updated_at, now);
    }

    #[test]
    fn test_parse_keeps_timestamps_and_numeric_ids() {
        let records = parse_import(
            r#"[{"id":42,"description":"","amount":1.25,"date":"2024-01-01","category":"Fees",
                "createdAt":"2024-01-01T10:00:00Z","updatedAt":"2024-01-02T10:00:00Z"}]"#,
            Utc::now(),
        )
        .unwrap();

        assert_eq!(records[0].id, "42");
        assert_eq!(records[0].description, "");
        assert_eq!(records[0].created_at.to_rfc3339(), "2024-01-01T10:00:00+00:00");
        assert_eq!(records[0].updated_at.to_rfc3339(), "2024-01-02T10:00:00+00:00");
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_import("[]", Utc::now()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(matches!(parse_import(r#"{"id":"a"}"#, Utc::now()), Err(ImportError::NotAnArray)));
        assert!(matches!(parse_import("nope", Utc::now()), Err(ImportError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_bad_elements() {
        let cases = [
            r#"[{"id":"a"}]"#,
            r#"[{"id":"","description":"x","amount":5,"date":"2024-01-01","category":"Food"}]"#,
            r#"[{"id":"a","description":3,"amount":5,"date":"2024-01-01","category":"Food"}]"#,
            r#"[{"id":"a","description":"x","amount":"5","date":"2024-01-01","category":"Food"}]"#,
            r#"[{"id":"a","description":"x","amount":5,"date":"","category":"Food"}]"#,
            r#"[{"id":"a","description":"x","amount":5,"date":"2024-01-01"}]"#,
            r#"[1]"#,
        ];
        for case in cases {
            assert!(
                matches!(parse_import(case, Utc::now()), Err(ImportError::InvalidRecord { index: 0 })),
                "accepted {}",
                case
            );
        }
    }

    #[test]
    fn test_rejection_reports_position() {
        let json = r#"[{"id":"a","description":"x","amount":5,"date":"2024-01-01","category":"Food"},{}]"#;
        assert!(matches!(parse_import(json, Utc::now()), Err(ImportError::InvalidRecord { index: 1 })));
    }

    #[test]
    fn test_export_file_name() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(export_file_name(today), "finance-records-2026-10-19.json");
    }
}
