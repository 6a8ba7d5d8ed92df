//! Transaction service
//!
//! CRUD for income and expense entries. Every successful mutation is
//! followed by a budget refresh so each budget's `spent` tracks the list.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::config::Context;
use crate::error::{TallyError, TallyResult};
use crate::models::{canonical_category, Money, Transaction, TransactionId, TransactionType};
use crate::storage::Storage;

use super::budget::BudgetService;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
    ctx: &'a Context,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub transaction_type: Option<TransactionType>,
    /// Category name, case-insensitive
    pub category: Option<String>,
    /// Inclusive start date
    pub start_date: Option<NaiveDate>,
    /// Inclusive end date
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive substring of the description
    pub search: Option<String>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, txn: &Transaction) -> bool {
        if let Some(kind) = self.transaction_type {
            if txn.transaction_type != kind {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !txn.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if txn.date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if txn.date > end {
                return false;
            }
        }
        if let Some(text) = &self.search {
            let needle = text.to_lowercase();
            if !txn.description.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub transaction_type: TransactionType,
    pub amount: Money,
    pub description: String,
    pub category: String,
    /// Defaults to today
    pub date: Option<NaiveDate>,
}

/// Partial update of a transaction; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub transaction_type: Option<TransactionType>,
    pub amount: Option<Money>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.transaction_type.is_none()
            && self.amount.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.date.is_none()
    }
}

fn normalize_category(kind: TransactionType, input: &str) -> String {
    canonical_category(kind, input)
        .map(str::to_string)
        .unwrap_or_else(|| input.trim().to_string())
}

fn label(txn: &Transaction) -> Option<String> {
    Some(format!("{} {}", txn.date, txn.description))
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage, ctx: &'a Context) -> Self {
        Self { storage, ctx }
    }

    /// Create a transaction and refresh budgets
    pub fn create(&self, input: CreateTransactionInput) -> TallyResult<Transaction> {
        let mut txn = Transaction::new(
            input.transaction_type,
            input.amount,
            input.description.trim(),
            normalize_category(input.transaction_type, &input.category),
            input.date.unwrap_or_else(|| self.ctx.today()),
        );
        txn.user_id = self.storage.profile.get()?.map(|p| p.id);
        txn.validate()?;

        self.storage.transactions.insert(txn.clone())?;
        self.budgets().refresh()?;

        self.storage
            .log_create(EntityType::Transaction, txn.id.to_string(), label(&txn), &txn);
        Ok(txn)
    }

    pub fn get(&self, id: TransactionId) -> TallyResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find a transaction by full UUID or `txn-xxxxxxxx`
    pub fn find(&self, identifier: &str) -> TallyResult<Option<Transaction>> {
        self.storage.transactions.find(identifier)
    }

    /// Find by ID, or fail with `NotFound`
    pub fn require(&self, identifier: &str) -> TallyResult<Transaction> {
        self.find(identifier)?
            .ok_or_else(|| TallyError::transaction_not_found(identifier))
    }

    /// Transactions matching `filter`, newest first
    pub fn list(&self, filter: TransactionFilter) -> TallyResult<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self
            .storage
            .transactions
            .get_all()?
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect();

        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    /// Apply `patch` and refresh budgets
    ///
    /// Changing the type without a new category keeps the old category, so
    /// the edit fails validation unless that category exists for both types.
    pub fn update(&self, id: TransactionId, patch: TransactionPatch) -> TallyResult<Transaction> {
        let before = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| TallyError::transaction_not_found(id.to_string()))?;

        let mut txn = before.clone();
        if let Some(kind) = patch.transaction_type {
            txn.transaction_type = kind;
        }
        if let Some(amount) = patch.amount {
            txn.amount = amount;
        }
        if let Some(description) = &patch.description {
            txn.description = description.trim().to_string();
        }
        if let Some(category) = &patch.category {
            txn.category = normalize_category(txn.transaction_type, category);
        }
        if let Some(date) = patch.date {
            txn.date = date;
        }
        txn.validate()?;
        txn.touch();

        self.storage.transactions.update(txn.clone())?;
        self.budgets().refresh()?;

        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            label(&txn),
            &before,
            &txn,
        );
        Ok(txn)
    }

    /// Delete a transaction and refresh budgets
    pub fn delete(&self, id: TransactionId) -> TallyResult<Transaction> {
        let txn = self.storage.transactions.delete(id)?;
        self.budgets().refresh()?;

        self.storage
            .log_delete(EntityType::Transaction, txn.id.to_string(), label(&txn), &txn);
        Ok(txn)
    }

    pub fn count(&self) -> TallyResult<usize> {
        self.storage.transactions.count()
    }

    fn budgets(&self) -> BudgetService<'a> {
        BudgetService::new(self.storage, self.ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::models::{Budget, BudgetPeriod};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> (Storage, Context) {
        let storage = Storage::in_memory("@tally").unwrap();
        let ctx = Context::fixed(AppConfig::default(), date(2025, 3, 15));
        (storage, ctx)
    }

    fn expense(units: i64, description: &str, on: NaiveDate) -> CreateTransactionInput {
        CreateTransactionInput {
            transaction_type: TransactionType::Expense,
            amount: Money::from_units(units),
            description: description.into(),
            category: "Food".into(),
            date: Some(on),
        }
    }

    #[test]
    fn test_create_defaults_date_and_trims() {
        let (storage, ctx) = setup();
        let service = TransactionService::new(&storage, &ctx);

        let txn = service
            .create(CreateTransactionInput {
                transaction_type: TransactionType::Income,
                amount: Money::from_units(5000),
                description: "  March salary ".into(),
                category: "salary".into(),
                date: None,
            })
            .unwrap();

        assert_eq!(txn.date, date(2025, 3, 15));
        assert_eq!(txn.description, "March salary");
        assert_eq!(txn.category, "Salary");
    }

    #[test]
    fn test_invalid_input_collects_errors() {
        let (storage, ctx) = setup();
        let service = TransactionService::new(&storage, &ctx);

        let err = service
            .create(CreateTransactionInput {
                transaction_type: TransactionType::Expense,
                amount: Money::zero(),
                description: "   ".into(),
                category: "Salary".into(),
                date: None,
            })
            .unwrap_err();

        assert!(err.is_validation());
        let message = err.to_string();
        assert!(message.contains("amount"));
        assert!(message.contains("description"));
        assert!(message.contains("Salary"));
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_list_filters_and_sorts_newest_first() {
        let (storage, ctx) = setup();
        let service = TransactionService::new(&storage, &ctx);

        service.create(expense(10, "Coffee beans", date(2025, 3, 1))).unwrap();
        service.create(expense(20, "Dinner out", date(2025, 3, 9))).unwrap();
        service.create(expense(30, "Coffee shop", date(2025, 2, 20))).unwrap();

        let all = service.list(TransactionFilter::new()).unwrap();
        let dates: Vec<_> = all.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![date(2025, 3, 9), date(2025, 3, 1), date(2025, 2, 20)]);

        let coffee = service.list(TransactionFilter::new().search("COFFEE")).unwrap();
        assert_eq!(coffee.len(), 2);

        let march = service
            .list(TransactionFilter::new().date_range(date(2025, 3, 1), date(2025, 3, 31)))
            .unwrap();
        assert_eq!(march.len(), 2);

        let limited = service.list(TransactionFilter::new().limit(1)).unwrap();
        assert_eq!(limited[0].description, "Dinner out");

        let income = service
            .list(TransactionFilter::new().kind(TransactionType::Income))
            .unwrap();
        assert!(income.is_empty());
    }

    #[test]
    fn test_mutations_refresh_budget_spent() {
        let (storage, ctx) = setup();
        storage
            .budgets
            .insert(Budget::new("Food", Money::from_units(1000), BudgetPeriod::Monthly))
            .unwrap();
        let service = TransactionService::new(&storage, &ctx);

        let lunch = service.create(expense(300, "Lunch", date(2025, 3, 3))).unwrap();
        assert_eq!(storage.budgets.get_all().unwrap()[0].spent(), Money::from_units(300));

        service
            .update(
                lunch.id,
                TransactionPatch {
                    amount: Some(Money::from_units(120)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(storage.budgets.get_all().unwrap()[0].spent(), Money::from_units(120));

        service.delete(lunch.id).unwrap();
        assert_eq!(storage.budgets.get_all().unwrap()[0].spent(), Money::zero());
    }

    #[test]
    fn test_type_change_with_stale_category_rejected() {
        let (storage, ctx) = setup();
        let service = TransactionService::new(&storage, &ctx);
        let txn = service.create(expense(50, "Pizza", date(2025, 3, 3))).unwrap();

        let err = service
            .update(
                txn.id,
                TransactionPatch {
                    transaction_type: Some(TransactionType::Income),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_validation());

        let updated = service
            .update(
                txn.id,
                TransactionPatch {
                    transaction_type: Some(TransactionType::Income),
                    category: Some("gift".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.category, "Gift");
        assert!(updated.is_income());
    }

    #[test]
    fn test_find_by_short_id() {
        let (storage, ctx) = setup();
        let service = TransactionService::new(&storage, &ctx);
        let txn = service.create(expense(50, "Pizza", date(2025, 3, 3))).unwrap();

        assert_eq!(service.require(&txn.id.short()).unwrap().id, txn.id);
        assert!(service.require("txn-ffffffff").unwrap_err().is_not_found());
    }
}
