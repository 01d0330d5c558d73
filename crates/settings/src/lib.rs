pub mod models;
pub mod service;

mod repository;

pub use models::{Currency, Settings, SettingsPatch, Theme, format_money};
pub use service::{SettingsError, SettingsStore};
