use chrono::{DateTime, Utc};
use search::{SearchScope, Searchable};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_CATEGORIES: [&str; 6] = ["Food", "Books", "Transport", "Entertainment", "Fees", "Other"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: String, // 'YYYY-MM-DD'
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Searchable for Record {
    fn search_fields(&self, scope: SearchScope) -> Vec<Cow<'_, str>> {
        let mut fields = vec![
            Cow::Borrowed(self.description.as_str()),
            Cow::Borrowed(self.category.as_str()),
            Cow::Owned(self.amount.to_string()),
        ];
        if scope == SearchScope::FieldsAndDate {
            fields.push(Cow::Borrowed(self.date.as_str()));
        }
        fields
    }
}

// ENCAPSULATION: only the field validator builds these, so a RecordInput
// always holds sanitized, rule-checked values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordInput {
    description: String,
    amount: f64,
    category: String,
    date: String,
}

impl RecordInput {
    pub(crate) fn new(description: String, amount: f64, category: String, date: String) -> Self {
        Self {
            description,
            amount,
            category,
            date,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> &str {
        &self.date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Date,
    Description,
    Amount,
    Category,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::Date => "date",
            SortKey::Description => "description",
            SortKey::Amount => "amount",
            SortKey::Category => "category",
        };
        f.write_str(name)
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "description" => Ok(SortKey::Description),
            "amount" => Ok(SortKey::Amount),
            "category" => Ok(SortKey::Category),
            other => Err(format!(
                "Unknown sort key '{}', expected date, description, amount or category",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        })
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(format!("Unknown sort direction '{}', expected asc or desc", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            key: SortKey::Date,
            direction: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_records: usize,
    pub total_spent: f64,
    pub avg_spent: f64,
    pub top_category_by_count: Option<String>,
    pub top_category_by_amount: Option<String>,
    pub category_counts: BTreeMap<String, usize>,
    pub category_amounts: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trend {
    pub labels: Vec<String>,
    pub amounts: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetInfo {
    pub budget_cap: f64,
    pub total_spent: f64,
    /// Distance from the cap, always non-negative; read with `is_over_budget`.
    pub remaining: f64,
    pub is_over_budget: bool,
    pub percent_used: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("Amount".parse::<SortKey>().unwrap(), SortKey::Amount);
        assert!("price".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!("ascending".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert_eq!("desc".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert!("up".parse::<SortDirection>().is_err());
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let now = Utc::now();
        let record = Record {
            id: "rec_1".into(),
            description: "Lunch".into(),
            amount: 12.5,
            category: "Food".into(),
            date: "2026-10-01".into(),
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["amount"], 12.5);
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
    }

    #[test]
    fn test_record_search_fields() {
        let now = Utc::now();
        let record = Record {
            id: "rec_1".into(),
            description: "Lunch".into(),
            amount: 5.0,
            category: "Food".into(),
            date: "2026-10-01".into(),
            created_at: now,
            updated_at: now,
        };

        let fields = record.search_fields(SearchScope::Fields);
        assert_eq!(fields, vec!["Lunch", "Food", "5"]);
        assert_eq!(record.search_fields(SearchScope::FieldsAndDate).len(), 4);
    }
}
