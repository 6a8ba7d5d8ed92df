//! JSON export and restore
//!
//! A full export carries every collection plus a schema version and summary
//! metadata. The same structure is read back by `tally import`.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audit::{AuditEntry, EntityType};
use crate::config::Context;
use crate::error::{TallyError, TallyResult};
use crate::models::{Budget, Settings, Transaction, UserProfile};
use crate::services::{recompute_all, BudgetService, RecomputeOptions};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full data store export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    #[serde(default)]
    pub profile: Option<UserProfile>,

    #[serde(default)]
    pub settings: Settings,

    #[serde(default)]
    pub transactions: Vec<Transaction>,

    #[serde(default)]
    pub budgets: Vec<Budget>,

    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub transaction_count: usize,

    pub budget_count: usize,

    /// Earliest transaction date
    pub earliest_transaction: Option<String>,

    /// Latest transaction date
    pub latest_transaction: Option<String>,
}

/// What a restore replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreSummary {
    pub transactions: usize,
    pub budgets: usize,
    pub profile: bool,
}

/// The four stored collections, written back in a fixed order
struct Contents {
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
    profile: Option<UserProfile>,
    settings: Settings,
}

impl Contents {
    fn read(storage: &Storage) -> TallyResult<Self> {
        Ok(Self {
            transactions: storage.transactions.get_all()?,
            budgets: storage.budgets.get_all()?,
            profile: storage.profile.get()?,
            settings: storage.settings.get()?,
        })
    }

    fn write(self, storage: &Storage) -> TallyResult<()> {
        storage.transactions.replace_all(self.transactions)?;
        storage.budgets.replace_all(self.budgets)?;
        match self.profile {
            Some(profile) => storage.profile.save(profile)?,
            None => {
                storage.profile.clear()?;
            }
        }
        storage.settings.save(self.settings)
    }
}

impl FullExport {
    /// Snapshot everything in storage, with budget spending as of today
    pub fn from_storage(storage: &Storage, ctx: &Context) -> TallyResult<Self> {
        let transactions = storage.transactions.get_all()?;
        let budgets = BudgetService::new(storage, ctx).list()?;

        let metadata = ExportMetadata {
            transaction_count: transactions.len(),
            budget_count: budgets.len(),
            earliest_transaction: transactions.iter().map(|t| t.date).min().map(|d| d.to_string()),
            latest_transaction: transactions.iter().map(|t| t.date).max().map(|d| d.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            profile: storage.profile.get()?,
            settings: storage.settings.get()?,
            transactions,
            budgets,
            metadata,
        })
    }

    /// Check version, record validity and uniqueness
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let mut txn_ids = HashSet::new();
        for txn in &self.transactions {
            if !txn_ids.insert(txn.id) {
                return Err(format!("Duplicate transaction ID {}", txn.id));
            }
            txn.validate()
                .map_err(|e| format!("Transaction {}: {}", txn.id, e))?;
        }

        let mut budget_ids = HashSet::new();
        let mut slots = HashSet::new();
        for budget in &self.budgets {
            if !budget_ids.insert(budget.id) {
                return Err(format!("Duplicate budget ID {}", budget.id));
            }
            if !slots.insert((budget.category.as_str(), budget.period)) {
                return Err(format!(
                    "More than one {} budget for {}",
                    budget.period, budget.category
                ));
            }
            budget
                .validate()
                .map_err(|e| format!("Budget {}: {}", budget.id, e))?;
        }

        if let Some(profile) = &self.profile {
            profile.validate().map_err(|e| format!("Profile: {}", e))?;
        }

        Ok(())
    }

    /// Replace the stored data with this export and recompute budgets
    ///
    /// Budget spending is recomputed before anything is written. If a write
    /// fails part way, the collections already replaced are put back.
    pub fn restore(self, storage: &Storage, ctx: &Context) -> TallyResult<RestoreSummary> {
        self.validate().map_err(TallyError::Import)?;

        let summary = RestoreSummary {
            transactions: self.transactions.len(),
            budgets: self.budgets.len(),
            profile: self.profile.is_some(),
        };

        let budgets = recompute_all(
            &self.budgets,
            &self.transactions,
            ctx.today(),
            RecomputeOptions::from(&ctx.config),
        );
        let incoming = Contents {
            transactions: self.transactions,
            budgets,
            profile: self.profile,
            settings: self.settings,
        };

        let previous = Contents::read(storage)?;
        if let Err(e) = incoming.write(storage) {
            return match previous.write(storage) {
                Ok(()) => Err(e),
                Err(rollback) => Err(TallyError::Storage(format!(
                    "{}; restoring the previous data also failed: {}",
                    e, rollback
                ))),
            };
        }

        storage.log(
            AuditEntry::update(
                EntityType::DataStore,
                storage.namespace(),
                None,
                &serde_json::Value::Null,
                &serde_json::Value::Null,
            )
            .with_summary(format!(
                "imported {} transactions, {} budgets",
                summary.transactions, summary.budgets
            )),
        );

        Ok(summary)
    }
}

/// Export the full data store to JSON
pub fn export_full_json<W: Write>(
    storage: &Storage,
    ctx: &Context,
    writer: &mut W,
    pretty: bool,
) -> TallyResult<()> {
    let export = FullExport::from_storage(storage, ctx)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| TallyError::Export(e.to_string()))?;

    Ok(())
}

/// Parse and validate a JSON export
pub fn import_from_json(json_str: &str) -> TallyResult<FullExport> {
    let export: FullExport =
        serde_json::from_str(json_str).map_err(|e| TallyError::Import(e.to_string()))?;

    export.validate().map_err(TallyError::Import)?;

    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::models::{BudgetPeriod, Currency, Money, TransactionType};
    use crate::storage::{KeyValueStore, MemoryStore};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn march_ctx() -> Context {
        Context::fixed(AppConfig::default(), date(2025, 3, 15))
    }

    /// Rejects writes to keys with the given suffix
    struct RejectingStore {
        inner: MemoryStore,
        suffix: &'static str,
    }

    impl KeyValueStore for RejectingStore {
        fn get(&self, key: &str) -> TallyResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> TallyResult<()> {
            if key.ends_with(self.suffix) {
                return Err(TallyError::Storage(format!("Write rejected for key {}", key)));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> TallyResult<()> {
            self.inner.remove(key)
        }

        fn keys(&self) -> TallyResult<Vec<String>> {
            self.inner.keys()
        }
    }

    fn populated_storage() -> Storage {
        let storage = Storage::in_memory("@tally").unwrap();
        storage
            .transactions
            .insert(Transaction::new(
                TransactionType::Expense,
                Money::from_units(300),
                "Groceries",
                "Food",
                date(2025, 3, 2),
            ))
            .unwrap();
        storage
            .budgets
            .insert(Budget::new("Food", Money::from_units(1000), BudgetPeriod::Monthly))
            .unwrap();
        storage
            .profile
            .save(UserProfile::new("Asha Rao", "asha@example.com", Currency::Inr))
            .unwrap();
        storage
    }

    #[test]
    fn test_full_export() {
        let storage = populated_storage();
        let mut output = Vec::new();
        export_full_json(&storage, &march_ctx(), &mut output, true).unwrap();

        let json = String::from_utf8(output).unwrap();
        assert!(json.contains("\"schema_version\": \"1.0.0\""));
        assert!(json.contains("Groceries"));

        let export = import_from_json(&json).unwrap();
        assert_eq!(export.metadata.transaction_count, 1);
        assert_eq!(export.metadata.earliest_transaction.as_deref(), Some("2025-03-02"));
    }

    #[test]
    fn test_restore_replaces_and_recomputes() {
        let source = populated_storage();
        let ctx = march_ctx();
        let export = FullExport::from_storage(&source, &ctx).unwrap();
        assert_eq!(export.budgets[0].spent(), Money::from_units(300));

        let target = Storage::in_memory("@tally").unwrap();
        let summary = export.restore(&target, &ctx).unwrap();

        assert_eq!(summary.transactions, 1);
        assert!(summary.profile);
        assert_eq!(target.transactions.get_all().unwrap(), source.transactions.get_all().unwrap());
        assert_eq!(target.budgets.get_all().unwrap()[0].spent(), Money::from_units(300));
    }

    #[test]
    fn test_schema_mismatch_rejected() {
        let storage = populated_storage();
        let mut export = FullExport::from_storage(&storage, &march_ctx()).unwrap();
        export.schema_version = "0.1".into();
        assert!(export.validate().unwrap_err().contains("Schema version mismatch"));
    }

    #[test]
    fn test_duplicate_budget_slot_rejected() {
        let storage = populated_storage();
        let mut export = FullExport::from_storage(&storage, &march_ctx()).unwrap();
        export
            .budgets
            .push(Budget::new("Food", Money::from_units(5), BudgetPeriod::Monthly));
        assert!(export.validate().unwrap_err().contains("More than one monthly budget"));
    }

    #[test]
    fn test_export_uses_current_period_spending() {
        let storage = populated_storage();
        let april = Context::fixed(AppConfig::default(), date(2025, 4, 2));
        let export = FullExport::from_storage(&storage, &april).unwrap();
        assert_eq!(export.budgets[0].spent(), Money::zero());
    }

    #[test]
    fn test_failed_restore_puts_previous_data_back() {
        let ctx = march_ctx();
        let export = FullExport::from_storage(&populated_storage(), &ctx).unwrap();

        let store = Arc::new(RejectingStore {
            inner: MemoryStore::new(),
            suffix: ":user",
        });
        let target = Storage::new(store, "@tally");
        target
            .transactions
            .insert(Transaction::new(
                TransactionType::Expense,
                Money::from_units(12),
                "Tea",
                "Food",
                date(2025, 3, 1),
            ))
            .unwrap();
        let before = target.transactions.get_all().unwrap();

        let err = export.restore(&target, &ctx).unwrap_err();
        assert!(err.is_storage());
        assert_eq!(target.transactions.get_all().unwrap(), before);
        assert!(target.budgets.get_all().unwrap().is_empty());

        target.load_all().unwrap();
        assert_eq!(target.transactions.get_all().unwrap(), before);
        assert!(target.budgets.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            import_from_json("{\"schema_version\":"),
            Err(TallyError::Import(_))
        ));
    }
}
