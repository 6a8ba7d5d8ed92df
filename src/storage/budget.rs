//! Budget repository
//!
//! Budgets are stored as one JSON array under `<namespace>:budgets`. The
//! one-budget-per-(category, period) rule is checked inside the write lock.

use std::sync::Arc;

use crate::error::{TallyError, TallyResult};
use crate::models::{Budget, BudgetId};

use super::collection::JsonList;
use super::kv::KeyValueStore;

pub struct BudgetRepository {
    list: JsonList<Budget>,
}

fn check_slot_free(items: &[Budget], budget: &Budget) -> TallyResult<()> {
    let taken = items
        .iter()
        .any(|b| b.id != budget.id && b.same_slot(&budget.category, budget.period));
    if taken {
        return Err(TallyError::duplicate_budget(&budget.category, budget.period));
    }
    Ok(())
}

impl BudgetRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, key: String) -> Self {
        Self {
            list: JsonList::new(store, key),
        }
    }

    pub fn load(&self) -> TallyResult<()> {
        self.list.load()
    }

    pub fn get(&self, id: BudgetId) -> TallyResult<Option<Budget>> {
        self.list.find(|b| b.id == id)
    }

    /// Look up by full UUID or short `bud-xxxxxxxx` form
    pub fn find(&self, identifier: &str) -> TallyResult<Option<Budget>> {
        self.list.find(|b| b.id.matches(identifier))
    }

    pub fn get_all(&self) -> TallyResult<Vec<Budget>> {
        self.list.all()
    }

    pub fn count(&self) -> TallyResult<usize> {
        self.list.len()
    }

    /// Add a budget; fails with `Duplicate` if its slot is taken
    pub fn insert(&self, budget: Budget) -> TallyResult<()> {
        self.list.mutate(|items| {
            check_slot_free(items, &budget)?;
            items.push(budget);
            Ok(())
        })
    }

    /// Replace the budget with the same ID, re-checking its slot
    pub fn update(&self, budget: Budget) -> TallyResult<()> {
        self.list.mutate(|items| {
            check_slot_free(items, &budget)?;
            let slot = items
                .iter_mut()
                .find(|b| b.id == budget.id)
                .ok_or_else(|| TallyError::budget_not_found(budget.id.to_string()))?;
            *slot = budget;
            Ok(())
        })
    }

    pub fn delete(&self, id: BudgetId) -> TallyResult<Budget> {
        self.list.mutate(|items| {
            let index = items
                .iter()
                .position(|b| b.id == id)
                .ok_or_else(|| TallyError::budget_not_found(id.to_string()))?;
            Ok(items.remove(index))
        })
    }

    pub fn replace_all(&self, budgets: Vec<Budget>) -> TallyResult<()> {
        self.list.replace_all(budgets)
    }

    pub fn clear(&self) -> TallyResult<()> {
        self.list.clear()
    }
}
