use crate::models::{Settings, SettingsPatch, Theme};
use crate::repository::SettingsRepository;
use storage::{Persisted, SharedStorage};
use tracing::instrument;
use validator::Validate;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Invalid settings: {0}")]
    Invalid(#[from] validator::ValidationErrors),
    #[error("Invalid settings: {0} must be a finite number")]
    NotFinite(&'static str),
}

fn check(settings: &Settings) -> Result<(), SettingsError> {
    let numbers = [
        ("budgetCap", settings.budget_cap),
        ("alt1Rate", settings.alt1_rate),
        ("alt2Rate", settings.alt2_rate),
    ];
    if let Some((name, _)) = numbers.into_iter().find(|(_, v)| !v.is_finite()) {
        return Err(SettingsError::NotFinite(name));
    }
    settings.validate()?;
    Ok(())
}

pub struct SettingsStore {
    storage: SharedStorage,
    settings: Settings,
}

impl SettingsStore {
    /// Loads stored settings over the defaults. The bare theme key, when present,
    /// wins over the theme inside the settings object.
    pub fn load(storage: SharedStorage) -> Self {
        let repo = SettingsRepository::new(storage.as_ref());

        let mut settings = match repo.load() {
            Ok(Some(stored)) => match check(&stored) {
                Ok(()) => stored,
                Err(e) => {
                    tracing::warn!("Stored settings rejected, using defaults: {}", e);
                    Settings::default()
                }
            },
            Ok(None) => Settings::default(),
            Err(e) => {
                tracing::warn!("Stored settings unreadable, using defaults: {}", e);
                Settings::default()
            }
        };

        match repo.load_theme() {
            Ok(Some(theme)) => settings.theme = theme,
            Ok(None) => {}
            Err(e) => tracing::warn!("Stored theme unreadable: {}", e),
        }

        Self { storage, settings }
    }

    pub fn get(&self) -> Settings {
        self.settings.clone()
    }

    pub fn budget_cap(&self) -> f64 {
        self.settings.budget_cap
    }

    pub fn theme(&self) -> Theme {
        self.settings.theme
    }

    fn persist(&self) -> bool {
        let repo = SettingsRepository::new(self.storage.as_ref());
        let result = repo
            .save(&self.settings)
            .and_then(|()| repo.save_theme(self.settings.theme));
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to save settings: {}", e);
                false
            }
        }
    }

    /// Merges `patch` into the current settings. The whole patch is rejected if the
    /// merged result breaks a rule.
    #[instrument(skip(self))]
    pub fn update(&mut self, patch: &SettingsPatch) -> Result<Persisted<Settings>, SettingsError> {
        let next = self.settings.merged(patch);
        check(&next)?;

        self.settings = next;
        tracing::info!("Settings updated");
        Ok(Persisted::new(self.get(), self.persist()))
    }

    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Persisted<Settings> {
        self.settings = Settings::default();
        Persisted::new(self.get(), self.persist())
    }

    #[instrument(skip(self))]
    pub fn set_theme(&mut self, theme: Theme) -> Persisted<Theme> {
        self.settings.theme = theme;
        Persisted::new(theme, self.persist())
    }

    pub fn toggle_theme(&mut self) -> Persisted<Theme> {
        let next = self.settings.theme.toggled();
        self.set_theme(next)
    }
}
