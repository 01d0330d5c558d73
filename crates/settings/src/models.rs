use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme '{}', expected light or dark", other)),
        }
    }
}

/// User configuration. Keys missing from stored JSON take their default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[validate(length(min = 1, message = "Base currency symbol cannot be empty"))]
    pub base_currency: String,
    #[validate(range(min = 0.0, message = "Budget cap cannot be negative"))]
    pub budget_cap: f64,
    #[validate(length(min = 1, message = "Currency symbol cannot be empty"))]
    pub alt1_symbol: String,
    #[validate(range(exclusive_min = 0.0, message = "Conversion rate must be greater than 0"))]
    pub alt1_rate: f64,
    #[validate(length(min = 1, message = "Currency symbol cannot be empty"))]
    pub alt2_symbol: String,
    #[validate(range(exclusive_min = 0.0, message = "Conversion rate must be greater than 0"))]
    pub alt2_rate: f64,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_currency: "$".to_string(),
            budget_cap: 1000.0,
            alt1_symbol: "€".to_string(),
            alt1_rate: 0.93,
            alt2_symbol: "£".to_string(),
            alt2_rate: 0.80,
            theme: Theme::Light,
        }
    }
}

/// A partial update; `None` leaves the current value alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub base_currency: Option<String>,
    pub budget_cap: Option<f64>,
    pub alt1_symbol: Option<String>,
    pub alt1_rate: Option<f64>,
    pub alt2_symbol: Option<String>,
    pub alt2_rate: Option<f64>,
    pub theme: Option<Theme>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Which configured currency to display an amount in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Base,
    Alt1,
    Alt2,
}

impl Settings {
    pub fn merged(&self, patch: &SettingsPatch) -> Settings {
        let mut next = self.clone();
        if let Some(v) = &patch.base_currency {
            next.base_currency = v.trim().to_string();
        }
        if let Some(v) = patch.budget_cap {
            next.budget_cap = v;
        }
        if let Some(v) = &patch.alt1_symbol {
            next.alt1_symbol = v.trim().to_string();
        }
        if let Some(v) = patch.alt1_rate {
            next.alt1_rate = v;
        }
        if let Some(v) = &patch.alt2_symbol {
            next.alt2_symbol = v.trim().to_string();
        }
        if let Some(v) = patch.alt2_rate {
            next.alt2_rate = v;
        }
        if let Some(v) = patch.theme {
            next.theme = v;
        }
        next
    }

    pub fn symbol(&self, currency: Currency) -> &str {
        match currency {
            Currency::Base => &self.base_currency,
            Currency::Alt1 => &self.alt1_symbol,
            Currency::Alt2 => &self.alt2_symbol,
        }
    }

    pub fn rate(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Base => 1.0,
            Currency::Alt1 => self.alt1_rate,
            Currency::Alt2 => self.alt2_rate,
        }
    }

    /// Display-only conversion from the base currency. Stored amounts never change.
    pub fn convert(&self, amount: f64, currency: Currency) -> f64 {
        amount * self.rate(currency)
    }

    pub fn display(&self, amount: f64, currency: Currency) -> String {
        format_money(self.symbol(currency), self.convert(amount, currency))
    }
}

pub fn format_money(symbol: &str, amount: f64) -> String {
    format!("{}{:.2}", symbol, amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_takes_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"budgetCap": 250}"#).unwrap();
        assert_eq!(settings.budget_cap, 250.0);
        assert_eq!(settings.base_currency, "$");
        assert_eq!(settings.alt1_symbol, "€");
        assert_eq!(settings.alt1_rate, 0.93);
        assert_eq!(settings.alt2_symbol, "£");
        assert_eq!(settings.alt2_rate, 0.80);
        assert_eq!(settings.theme, Theme::Light);
    }

    #[test]
    fn test_serialized_keys() {
        let value = serde_json::to_value(Settings::default()).unwrap();
        for key in ["baseCurrency", "budgetCap", "alt1Symbol", "alt1Rate", "alt2Symbol", "alt2Rate", "theme"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(value["theme"], "light");
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rules() {
        let base = Settings::default();

        let negative_cap = base.merged(&SettingsPatch { budget_cap: Some(-1.0), ..Default::default() });
        assert!(negative_cap.validate().is_err());

        let zero_rate = base.merged(&SettingsPatch { alt1_rate: Some(0.0), ..Default::default() });
        assert!(zero_rate.validate().is_err());

        let blank_symbol = base.merged(&SettingsPatch { alt2_symbol: Some("  ".into()), ..Default::default() });
        assert!(blank_symbol.validate().is_err());

        let zero_cap = base.merged(&SettingsPatch { budget_cap: Some(0.0), ..Default::default() });
        assert!(zero_cap.validate().is_ok());
    }

    #[test]
    fn test_merge_only_touches_given_keys() {
        let merged = Settings::default().merged(&SettingsPatch {
            base_currency: Some("CHF ".into()),
            ..Default::default()
        });
        assert_eq!(merged.base_currency, "CHF");
        assert_eq!(merged.budget_cap, 1000.0);
    }

    #[test]
    fn test_display_conversion() {
        let settings = Settings::default();
        assert_eq!(settings.display(100.0, Currency::Base), "$100.00");
        assert_eq!(settings.display(100.0, Currency::Alt1), "€93.00");
        assert_eq!(settings.display(100.0, Currency::Alt2), "£80.00");
    }

    #[test]
    fn test_theme_parse_and_toggle() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("blue".parse::<Theme>().is_err());
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }
}
