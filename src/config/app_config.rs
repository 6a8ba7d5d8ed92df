//! Application configuration
//!
//! Tunables for the storage namespace, budget health bands and period
//! windows. Persisted as `config.json` in the base directory; fields missing
//! from the file take their defaults.

use serde::{Deserialize, Serialize};

use super::paths::TallyPaths;
use crate::error::TallyError;
use crate::models::{HealthThresholds, WeekStart};

/// Default prefix for every storage key
pub const DEFAULT_NAMESPACE: &str = "@tally";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Prefix for storage keys, e.g. `@tally:transactions`
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Utilization bands for budget health
    #[serde(default)]
    pub budget_health: HealthThresholds,

    /// Count only transactions dated before the end of a budget's window.
    /// When off, anything on or after the window start counts, including
    /// future-dated entries.
    #[serde(default = "default_enforce_period_end")]
    pub enforce_period_end: bool,

    /// First day of weekly budget windows
    #[serde(default)]
    pub week_start: WeekStart,
}

fn default_schema_version() -> u32 {
    1
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_enforce_period_end() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            namespace: default_namespace(),
            budget_health: HealthThresholds::default(),
            enforce_period_end: default_enforce_period_end(),
            week_start: WeekStart::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &TallyPaths) -> Result<Self, TallyError> {
        let config_path = paths.config_file();

        if !config_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)
            .map_err(|e| TallyError::Io(format!("Failed to read config file: {}", e)))?;

        let config: AppConfig = serde_json::from_str(&contents)
            .map_err(|e| TallyError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self, paths: &TallyPaths) -> Result<(), TallyError> {
        self.validate()?;
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| TallyError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(paths.config_file(), contents)
            .map_err(|e| TallyError::Io(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), TallyError> {
        if self.namespace.trim().is_empty() {
            return Err(TallyError::Config("Storage namespace cannot be empty".into()));
        }
        self.budget_health
            .validate()
            .map_err(|e| TallyError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.namespace, "@tally");
        assert_eq!(config.budget_health.warning_percent, 70);
        assert!(config.enforce_period_end);
        assert_eq!(config.week_start, WeekStart::Sunday);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut config = AppConfig::default();
        config.budget_health = HealthThresholds::new(80, 100);
        config.week_start = WeekStart::Monday;
        config.save(&paths).unwrap();

        let loaded = AppConfig::load_or_create(&paths).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_merges_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.config_file(), r#"{"enforce_period_end": false}"#).unwrap();

        let loaded = AppConfig::load_or_create(&paths).unwrap();
        assert!(!loaded.enforce_period_end);
        assert_eq!(loaded.namespace, DEFAULT_NAMESPACE);
        assert_eq!(loaded.budget_health, HealthThresholds::default());
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(
            paths.config_file(),
            r#"{"budget_health": {"warning_percent": 120, "over_percent": 100}}"#,
        )
        .unwrap();

        let err = AppConfig::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, TallyError::Config(_)));
    }
}
