use chrono::{Local, NaiveDate};
use clap::Args;
use records::{BudgetInfo, FieldValidator, RecordStore};
use settings::SettingsStore;
use std::path::PathBuf;
use std::sync::Arc;
use storage::{FileStorage, SharedStorage, StorageError};

/// Application root: owns both stores for the whole session.
pub struct AppState {
    pub records: RecordStore,
    pub settings: SettingsStore,
    pub config: Config,
}

#[derive(Clone, Debug, Args)]
pub struct Config {
    #[arg(long, env = "FINANCE_DATA_DIR", default_value = "finance-data", global = true)]
    pub data_dir: PathBuf,
}

impl AppState {
    pub fn open(config: Config) -> Result<Self, StorageError> {
        let storage: SharedStorage = Arc::new(FileStorage::new(&config.data_dir)?);
        let state = Self::with_storage(storage, config);
        tracing::debug!(
            "Loaded {} records from {}",
            state.records.len(),
            state.config.data_dir.display()
        );
        Ok(state)
    }

    pub fn with_storage(storage: SharedStorage, config: Config) -> Self {
        Self {
            records: RecordStore::load(storage.clone()),
            settings: SettingsStore::load(storage),
            config,
        }
    }

    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn validator(&self) -> FieldValidator {
        FieldValidator::at(self.today())
    }

    pub fn budget_info(&self) -> BudgetInfo {
        self.records.budget_info(self.settings.budget_cap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use records::RawRecordFields;
    use settings::SettingsPatch;
    use storage::get_test_storage;

    fn state() -> AppState {
        let config = Config {
            data_dir: PathBuf::from("unused"),
        };
        AppState::with_storage(get_test_storage(), config)
    }

    #[test]
    fn test_budget_info_uses_configured_cap() {
        let mut state = state();
        state
            .settings
            .update(&SettingsPatch { budget_cap: Some(100.0), ..Default::default() })
            .unwrap();

        let raw = RawRecordFields {
            description: "Concert".into(),
            amount: "150".into(),
            category: "Entertainment".into(),
            date: state.today().format("%Y-%m-%d").to_string(),
        };
        let accepted = state.validator().accept(&raw).unwrap();
        state.records.add(&accepted.input);

        let info = state.budget_info();
        assert_eq!(info.budget_cap, 100.0);
        assert_eq!(info.remaining, 50.0);
        assert!(info.is_over_budget);
    }

    #[test]
    fn test_open_creates_data_dir() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("finance-data");
        let state = AppState::open(Config { data_dir: dir.clone() }).unwrap();

        assert!(dir.is_dir());
        assert!(state.records.is_empty());
    }
}
