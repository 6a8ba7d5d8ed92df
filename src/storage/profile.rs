//! Profile and settings documents

use std::sync::Arc;

use crate::error::TallyResult;
use crate::models::{Settings, UserProfile};

use super::collection::JsonDocument;
use super::kv::KeyValueStore;

/// The single user profile under `<namespace>:user`
pub struct ProfileRepository {
    doc: JsonDocument<UserProfile>,
}

impl ProfileRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, key: String) -> Self {
        Self {
            doc: JsonDocument::new(store, key),
        }
    }

    pub fn load(&self) -> TallyResult<()> {
        self.doc.load()
    }

    pub fn get(&self) -> TallyResult<Option<UserProfile>> {
        self.doc.get()
    }

    pub fn save(&self, profile: UserProfile) -> TallyResult<()> {
        self.doc.set(profile)
    }

    pub fn clear(&self) -> TallyResult<Option<UserProfile>> {
        self.doc.clear()
    }
}

/// Preferences under `<namespace>:settings`; reads fall back to defaults
pub struct SettingsRepository {
    doc: JsonDocument<Settings>,
}

impl SettingsRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, key: String) -> Self {
        Self {
            doc: JsonDocument::new(store, key),
        }
    }

    pub fn load(&self) -> TallyResult<()> {
        self.doc.load()
    }

    pub fn get(&self) -> TallyResult<Settings> {
        Ok(self.doc.get()?.unwrap_or_default())
    }

    pub fn save(&self, settings: Settings) -> TallyResult<()> {
        self.doc.set(settings)
    }

    pub fn clear(&self) -> TallyResult<()> {
        self.doc.clear().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Currency;
    use crate::storage::kv::MemoryStore;

    #[test]
    fn test_settings_merge_defaults() {
        let store = Arc::new(MemoryStore::new());
        store
            .set("@tally:settings", r#"{"currency":"USD"}"#)
            .unwrap();

        let repo = SettingsRepository::new(store, "@tally:settings".into());
        repo.load().unwrap();
        let settings = repo.get().unwrap();
        assert_eq!(settings.currency, Currency::Usd);
        assert!(settings.notifications_enabled);
    }

    #[test]
    fn test_malformed_settings_read_as_default() {
        let store = Arc::new(MemoryStore::new());
        store.set("@tally:settings", "[1,2").unwrap();

        let repo = SettingsRepository::new(store, "@tally:settings".into());
        repo.load().unwrap();
        assert_eq!(repo.get().unwrap(), Settings::default());
    }

    #[test]
    fn test_profile_save_and_clear() {
        let store = Arc::new(MemoryStore::new());
        let repo = ProfileRepository::new(store, "@tally:user".into());
        repo.load().unwrap();
        assert!(repo.get().unwrap().is_none());

        repo.save(UserProfile::new("Asha Rao", "asha@example.com", Currency::Inr))
            .unwrap();
        assert_eq!(repo.get().unwrap().unwrap().name, "Asha Rao");

        assert!(repo.clear().unwrap().is_some());
        assert!(repo.get().unwrap().is_none());
    }
}
