//! Settings service

use crate::audit::EntityType;
use crate::error::TallyResult;
use crate::models::{Settings, SettingsPatch};
use crate::storage::Storage;

const SETTINGS_ID: &str = "settings";

pub struct SettingsService<'a> {
    storage: &'a Storage,
}

impl<'a> SettingsService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Stored settings with defaults filled in
    pub fn get(&self) -> TallyResult<Settings> {
        self.storage.settings.get()
    }

    pub fn update(&self, patch: SettingsPatch) -> TallyResult<Settings> {
        let before = self.storage.settings.get()?;
        let mut settings = before.clone();
        patch.apply(&mut settings);

        if settings == before {
            return Ok(settings);
        }

        self.storage.settings.save(settings.clone())?;
        self.storage
            .log_update(EntityType::Settings, SETTINGS_ID, None, &before, &settings);
        Ok(settings)
    }

    /// Drop stored settings so every field reads as its default
    pub fn reset(&self) -> TallyResult<Settings> {
        let before = self.storage.settings.get()?;
        self.storage.settings.clear()?;
        let settings = Settings::default();
        self.storage
            .log_update(EntityType::Settings, SETTINGS_ID, None, &before, &settings);
        Ok(settings)
    }
}
