//! Transaction repository
//!
//! Transactions are stored as one JSON array under `<namespace>:transactions`,
//! in insertion order.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::{TallyError, TallyResult};
use crate::models::{Transaction, TransactionId};

use super::collection::JsonList;
use super::kv::KeyValueStore;

pub struct TransactionRepository {
    list: JsonList<Transaction>,
}

impl TransactionRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, key: String) -> Self {
        Self {
            list: JsonList::new(store, key),
        }
    }

    pub fn load(&self) -> TallyResult<()> {
        self.list.load()
    }

    pub fn get(&self, id: TransactionId) -> TallyResult<Option<Transaction>> {
        self.list.find(|t| t.id == id)
    }

    /// Look up by full UUID or short `txn-xxxxxxxx` form
    pub fn find(&self, identifier: &str) -> TallyResult<Option<Transaction>> {
        self.list.find(|t| t.id.matches(identifier))
    }

    /// All transactions in stored order
    pub fn get_all(&self) -> TallyResult<Vec<Transaction>> {
        self.list.all()
    }

    /// Transactions dated in `[start, end]`
    pub fn get_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> TallyResult<Vec<Transaction>> {
        self.list.filter(|t| t.date >= start && t.date <= end)
    }

    pub fn count(&self) -> TallyResult<usize> {
        self.list.len()
    }

    pub fn insert(&self, transaction: Transaction) -> TallyResult<()> {
        self.list.mutate(|items| {
            items.push(transaction);
            Ok(())
        })
    }

    /// Replace the stored transaction with the same ID
    pub fn update(&self, transaction: Transaction) -> TallyResult<()> {
        self.list.mutate(|items| {
            let slot = items
                .iter_mut()
                .find(|t| t.id == transaction.id)
                .ok_or_else(|| TallyError::transaction_not_found(transaction.id.to_string()))?;
            *slot = transaction;
            Ok(())
        })
    }

    /// Remove and return a transaction
    pub fn delete(&self, id: TransactionId) -> TallyResult<Transaction> {
        self.list.mutate(|items| {
            let index = items
                .iter()
                .position(|t| t.id == id)
                .ok_or_else(|| TallyError::transaction_not_found(id.to_string()))?;
            Ok(items.remove(index))
        })
    }

    pub fn replace_all(&self, transactions: Vec<Transaction>) -> TallyResult<()> {
        self.list.replace_all(transactions)
    }

    pub fn clear(&self) -> TallyResult<()> {
        self.list.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, TransactionType};
    use crate::storage::kv::MemoryStore;

    fn create_test_repo() -> (TransactionRepository, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let repo = TransactionRepository::new(store.clone(), "@tally:transactions".into());
        repo.load().unwrap();
        (repo, store)
    }

    fn expense(cents: i64, day: u32) -> Transaction {
        Transaction::new(
            TransactionType::Expense,
            Money::from_cents(cents),
            "Lunch",
            "Food",
            NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
        )
    }

    #[test]
    fn test_insert_and_get() {
        let (repo, _store) = create_test_repo();
        let txn = expense(5000, 15);
        let id = txn.id;

        repo.insert(txn).unwrap();

        let retrieved = repo.get(id).unwrap().unwrap();
        assert_eq!(retrieved.amount.cents(), 5000);
        assert!(repo.find(&id.short()).unwrap().is_some());
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_reload_preserves_order() {
        let (repo, store) = create_test_repo();
        let first = expense(100, 3);
        let second = expense(200, 1);
        let third = expense(300, 2);
        let ids = vec![first.id, second.id, third.id];

        repo.insert(first).unwrap();
        repo.insert(second).unwrap();
        repo.insert(third).unwrap();

        let reloaded = TransactionRepository::new(store, "@tally:transactions".into());
        reloaded.load().unwrap();
        let loaded: Vec<_> = reloaded.get_all().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(loaded, ids);
        assert_eq!(reloaded.get_all().unwrap(), repo.get_all().unwrap());
    }

    #[test]
    fn test_update_and_delete_missing() {
        let (repo, _store) = create_test_repo();
        let txn = expense(100, 1);

        assert!(repo.update(txn.clone()).unwrap_err().is_not_found());
        assert!(repo.delete(txn.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let (repo, _store) = create_test_repo();
        repo.insert(expense(100, 1)).unwrap();
        repo.insert(expense(200, 15)).unwrap();
        repo.insert(expense(300, 31)).unwrap();

        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(repo.get_by_date_range(start, end).unwrap().len(), 2);
    }

    #[test]
    fn test_failed_write_leaves_list_unchanged() {
        let (repo, store) = create_test_repo();
        let kept = expense(100, 1);
        repo.insert(kept.clone()).unwrap();

        store.set_fail_writes(true);
        assert!(repo.insert(expense(200, 2)).is_err());
        assert!(repo.delete(kept.id).is_err());

        assert_eq!(repo.get_all().unwrap(), vec![kept]);
    }
}
