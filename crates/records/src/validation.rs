use crate::models::{Record, RecordInput};
use chrono::{Days, Local, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

pub const MAX_AMOUNT: f64 = 999_999.99;
pub const LARGE_AMOUNT: f64 = 10_000.0;
/// Oldest accepted date, counted in days back from today.
pub const MAX_AGE_DAYS: i64 = 365;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const DESCRIPTION_WHITESPACE_MESSAGE: &str = "Description cannot start or end with spaces.";

// Integer without a leading zero (or exactly 0), optionally 1-2 decimals.
static AMOUNT_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0|[1-9]\d*)(\.\d{1,2})?$").expect("amount pattern compiles"));

// Pattern-level only: 2026-02-31 passes here.
static DATE_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").expect("date pattern compiles")
});

static ANGLE_BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[<>]").expect("angle bracket pattern compiles"));

static SCRIPT_PROTOCOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:").expect("protocol pattern compiles"));

static EVENT_HANDLER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bon\w+\s*=").expect("event handler pattern compiles"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Description,
    Amount,
    Category,
    Date,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Description => "description",
            Field::Amount => "amount",
            Field::Category => "category",
            Field::Date => "date",
        })
    }
}

/// Non-blocking findings; they never make a report invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Warning {
    DuplicateWords,
    LargeAmount,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Warning::DuplicateWords => "duplicate words",
            Warning::LargeAmount => "large amount",
        })
    }
}

/// Form values exactly as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecordFields {
    pub description: String,
    pub amount: String,
    pub category: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldCheck {
    pub valid: bool,
    pub message: String,
}

impl FieldCheck {
    fn ok() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: BTreeMap<Field, String>,
    pub warnings: BTreeMap<Warning, String>,
}

/// Changes to an existing record; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordEdit {
    pub description: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
}

/// A record that passed validation, plus whatever warnings it raised.
#[derive(Debug, Clone, PartialEq)]
pub struct Accepted {
    pub input: RecordInput,
    pub warnings: BTreeMap<Warning, String>,
}

/// Strips markup and script vectors, escapes what is left, and trims.
pub fn sanitize(text: &str) -> String {
    let stripped = ANGLE_BRACKETS.replace_all(text, "");
    let stripped = SCRIPT_PROTOCOL.replace_all(&stripped, "");
    let stripped = EVENT_HANDLER.replace_all(&stripped, "");

    search::escape_html(&stripped)
        .replace('/', "&#x2F;")
        .trim()
        .to_string()
}

/// Reads a pattern-valid date; out-of-range days roll into the next month.
fn calendar_date(value: &str) -> Option<NaiveDate> {
    let caps = DATE_FORMAT.captures(value)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u64 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_days(Days::new(day - 1))
}

#[derive(Debug, Clone, Copy)]
pub struct FieldValidator {
    today: NaiveDate,
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self::at(Local::now().date_naive())
    }
}

impl FieldValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A validator whose date window is anchored on `today`.
    pub fn at(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn validate(&self, field: Field, value: &str) -> FieldCheck {
        if value.trim().is_empty() {
            return FieldCheck::fail(REQUIRED_MESSAGE);
        }

        match field {
            Field::Description => self.check_description(value),
            Field::Amount => self.check_amount(value),
            Field::Category => FieldCheck::ok(),
            Field::Date => self.check_date(value),
        }
    }

    fn check_description(&self, value: &str) -> FieldCheck {
        let padded = value.starts_with(char::is_whitespace) || value.ends_with(char::is_whitespace);
        if padded {
            FieldCheck::fail(DESCRIPTION_WHITESPACE_MESSAGE)
        } else {
            FieldCheck::ok()
        }
    }

    fn check_amount(&self, value: &str) -> FieldCheck {
        if !AMOUNT_FORMAT.is_match(value) {
            return FieldCheck::fail(format!(
                "\"{}\" is not a valid amount. Use a number with up to 2 decimals, e.g. 12 or 12.50.",
                value
            ));
        }

        match value.parse::<f64>() {
            Ok(amount) if amount > 0.0 && amount <= MAX_AMOUNT => FieldCheck::ok(),
            _ => FieldCheck::fail(format!(
                "Amount must be greater than 0 and at most {:.2}.",
                MAX_AMOUNT
            )),
        }
    }

    fn check_date(&self, value: &str) -> FieldCheck {
        let Some(date) = calendar_date(value) else {
            return FieldCheck::fail(format!("\"{}\" is not a valid date. Use YYYY-MM-DD.", value));
        };

        if date > self.today {
            return FieldCheck::fail(format!("{} is in the future.", value));
        }

        if (self.today - date).num_days() > MAX_AGE_DAYS {
            return FieldCheck::fail(format!("{} is more than one year ago.", value));
        }

        FieldCheck::ok()
    }

    pub fn warnings(&self, raw: &RawRecordFields) -> BTreeMap<Warning, String> {
        let mut warnings = BTreeMap::new();

        if let Some(word) = search::find_duplicate_word(&raw.description) {
            warnings.insert(
                Warning::DuplicateWords,
                format!("The word \"{}\" appears twice in a row.", word),
            );
        }

        let amount = AMOUNT_FORMAT
            .is_match(&raw.amount)
            .then(|| raw.amount.parse::<f64>().ok())
            .flatten();
        if let Some(amount) = amount.filter(|a| *a > LARGE_AMOUNT) {
            warnings.insert(
                Warning::LargeAmount,
                format!("{:.2} is an unusually large amount. Double-check it.", amount),
            );
        }

        warnings
    }

    /// Runs every rule and collects every failure, not just the first.
    pub fn validate_record(&self, raw: &RawRecordFields) -> ValidationReport {
        let fields = [
            (Field::Description, raw.description.as_str()),
            (Field::Amount, raw.amount.as_str()),
            (Field::Category, raw.category.as_str()),
            (Field::Date, raw.date.as_str()),
        ];

        let errors: BTreeMap<Field, String> = fields
            .into_iter()
            .filter_map(|(field, value)| {
                let check = self.validate(field, value);
                (!check.valid).then_some((field, check.message))
            })
            .collect();

        ValidationReport {
            valid: errors.is_empty(),
            errors,
            warnings: self.warnings(raw),
        }
    }

    /// Validates the raw values, then sanitizes description and category.
    ///
    /// A value made only of stripped characters comes out empty and fails as required.
    pub fn accept(&self, raw: &RawRecordFields) -> Result<Accepted, ValidationReport> {
        let mut report = self.validate_record(raw);
        if !report.valid {
            return Err(report);
        }

        let description = sanitize_required(Field::Description, &raw.description, &mut report.errors);
        let category = sanitize_required(Field::Category, &raw.category, &mut report.errors);
        let amount = parse_amount(&raw.amount, &mut report.errors);

        if !report.errors.is_empty() {
            report.valid = false;
            return Err(report);
        }

        Ok(Accepted {
            input: RecordInput::new(description, amount, category, raw.date.clone()),
            warnings: report.warnings,
        })
    }

    /// Checks only the fields `edit` supplies. Omitted fields keep the stored value of
    /// `current` unchecked, so an imported record that predates today's rules can
    /// still be edited.
    pub fn accept_edit(&self, current: &Record, edit: &RecordEdit) -> Result<Accepted, ValidationReport> {
        let supplied = [
            (Field::Description, edit.description.as_deref()),
            (Field::Amount, edit.amount.as_deref()),
            (Field::Category, edit.category.as_deref()),
            (Field::Date, edit.date.as_deref()),
        ];
        let mut errors: BTreeMap<Field, String> = supplied
            .into_iter()
            .filter_map(|(field, value)| {
                let check = self.validate(field, value?);
                (!check.valid).then_some((field, check.message))
            })
            .collect();
        let warnings = self.warnings(&RawRecordFields {
            description: edit.description.clone().unwrap_or_default(),
            amount: edit.amount.clone().unwrap_or_default(),
            ..Default::default()
        });

        let description = match &edit.description {
            Some(value) => sanitize_required(Field::Description, value, &mut errors),
            None => current.description.clone(),
        };
        let category = match &edit.category {
            Some(value) => sanitize_required(Field::Category, value, &mut errors),
            None => current.category.clone(),
        };
        let amount = match &edit.amount {
            Some(value) => parse_amount(value, &mut errors),
            None => current.amount,
        };
        let date = edit.date.clone().unwrap_or_else(|| current.date.clone());

        if !errors.is_empty() {
            return Err(ValidationReport {
                valid: false,
                errors,
                warnings,
            });
        }

        Ok(Accepted {
            input: RecordInput::new(description, amount, category, date),
            warnings,
        })
    }
}

fn sanitize_required(field: Field, value: &str, errors: &mut BTreeMap<Field, String>) -> String {
    let clean = sanitize(value);
    if clean.is_empty() {
        errors.entry(field).or_insert_with(|| REQUIRED_MESSAGE.to_string());
    }
    clean
}

fn parse_amount(value: &str, errors: &mut BTreeMap<Field, String>) -> f64 {
    value.parse::<f64>().unwrap_or_else(|_| {
        errors
            .entry(Field::Amount)
            .or_insert_with(|| format!("\"{}\" is not a valid amount.", value));
        0.0
    })
}
