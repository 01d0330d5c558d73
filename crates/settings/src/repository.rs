use crate::models::{Settings, Theme};
use storage::{self, SETTINGS_KEY, THEME_KEY, Storage, StorageError};

pub(crate) struct SettingsRepository<'a> {
    storage: &'a dyn Storage,
}

impl<'a> SettingsRepository<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    pub fn load(&self) -> Result<Option<Settings>, StorageError> {
        storage::load_json(self.storage, SETTINGS_KEY)
    }

    pub fn save(&self, settings: &Settings) -> Result<(), StorageError> {
        storage::save_json(self.storage, SETTINGS_KEY, settings)
    }

    /// The theme is kept as a bare string, not JSON.
    pub fn load_theme(&self) -> Result<Option<Theme>, StorageError> {
        let Some(raw) = self.storage.get_item(THEME_KEY)? else {
            return Ok(None);
        };
        match raw.parse::<Theme>() {
            Ok(theme) => Ok(Some(theme)),
            Err(e) => {
                tracing::warn!("Ignoring stored theme: {}", e);
                Ok(None)
            }
        }
    }

    pub fn save_theme(&self, theme: Theme) -> Result<(), StorageError> {
        self.storage.set_item(THEME_KEY, theme.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::get_test_storage;

    #[test]
    fn test_theme_is_bare_string() {
        let storage = get_test_storage();
        let repo = SettingsRepository::new(storage.as_ref());

        repo.save_theme(Theme::Dark).unwrap();
        assert_eq!(storage.get_item(THEME_KEY).unwrap(), Some("dark".to_string()));
        assert_eq!(repo.load_theme().unwrap(), Some(Theme::Dark));
    }

    #[test]
    fn test_unknown_theme_is_ignored() {
        let storage = get_test_storage();
        storage.set_item(THEME_KEY, "\"dark\"").unwrap();

        let repo = SettingsRepository::new(storage.as_ref());
        assert_eq!(repo.load_theme().unwrap(), None);
    }

    #[test]
    fn test_settings_roundtrip() {
        let storage = get_test_storage();
        let repo = SettingsRepository::new(storage.as_ref());
        assert!(repo.load().unwrap().is_none());

        let settings = Settings {
            budget_cap: 42.0,
            ..Settings::default()
        };
        repo.save(&settings).unwrap();
        assert_eq!(repo.load().unwrap(), Some(settings));
    }
}
