//! Storage layer for Tally
//!
//! Every collection is a JSON blob under a namespaced key in a
//! [`KeyValueStore`]. Repositories cache their blob in memory and write
//! through on each mutation; the cache only changes after the store accepts
//! the write.

pub mod budget;
pub mod collection;
pub mod file_io;
pub mod keys;
pub mod kv;
pub mod profile;
pub mod transactions;

pub use budget::BudgetRepository;
pub use file_io::FileStore;
pub use keys::StorageKey;
pub use kv::{KeyValueStore, MemoryStore};
pub use profile::{ProfileRepository, SettingsRepository};
pub use transactions::TransactionRepository;

use std::sync::Arc;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::{AppConfig, TallyPaths};
use crate::error::TallyResult;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    store: Arc<dyn KeyValueStore>,
    namespace: String,
    audit: Option<AuditLogger>,
    pub transactions: TransactionRepository,
    pub budgets: BudgetRepository,
    pub profile: ProfileRepository,
    pub settings: SettingsRepository,
}

impl Storage {
    /// Build repositories over `store` under `namespace`. Nothing is loaded.
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        Self {
            transactions: TransactionRepository::new(
                store.clone(),
                StorageKey::Transactions.key(&namespace),
            ),
            budgets: BudgetRepository::new(store.clone(), StorageKey::Budgets.key(&namespace)),
            profile: ProfileRepository::new(store.clone(), StorageKey::User.key(&namespace)),
            settings: SettingsRepository::new(store.clone(), StorageKey::Settings.key(&namespace)),
            store,
            namespace,
            audit: None,
        }
    }

    /// Open the on-disk store under `paths` and load everything
    pub fn open(paths: &TallyPaths, config: &AppConfig) -> TallyResult<Self> {
        paths.ensure_directories()?;
        let store = Arc::new(FileStore::new(paths.data_dir()));
        let storage =
            Self::new(store, config.namespace.clone()).with_audit(AuditLogger::new(paths.audit_log()));
        storage.load_all()?;
        Ok(storage)
    }

    /// An empty in-memory store, loaded and ready
    pub fn in_memory(namespace: impl Into<String>) -> TallyResult<Self> {
        let storage = Self::new(Arc::new(MemoryStore::new()), namespace);
        storage.load_all()?;
        Ok(storage)
    }

    /// Record every mutation in `logger`
    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub fn audit(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    /// Reload every repository from the store
    pub fn load_all(&self) -> TallyResult<()> {
        self.profile.load()?;
        self.transactions.load()?;
        self.budgets.load()?;
        self.settings.load()?;
        Ok(())
    }

    /// Remove all four namespaces
    pub fn clear_all(&self) -> TallyResult<()> {
        self.transactions.clear()?;
        self.budgets.clear()?;
        self.profile.clear()?;
        self.settings.clear()?;
        self.log(AuditEntry::delete(
            EntityType::DataStore,
            self.namespace.clone(),
            None,
            &serde_json::Value::Null,
        )
        .with_summary("all data cleared"));
        Ok(())
    }

    /// Append an entry to the audit log, if one is attached
    ///
    /// Entries are written after the data they describe is committed, so a
    /// failed append is reported on stderr and never undoes the change.
    pub fn log(&self, entry: AuditEntry) {
        if let Some(logger) = &self.audit {
            if let Err(e) = logger.log(&entry) {
                eprintln!("Warning: failed to write audit log: {}", e);
            }
        }
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        self.log(AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) {
        self.log(AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        self.log(AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}
