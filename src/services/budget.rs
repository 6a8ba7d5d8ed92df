//! Budget service
//!
//! CRUD for category budgets plus the refresh that keeps every budget's
//! `spent` in line with the transaction list.

use crate::audit::EntityType;
use crate::config::Context;
use crate::error::{TallyError, TallyResult};
use crate::models::{canonical_category, Budget, BudgetId, BudgetPeriod, Money, TransactionType};
use crate::storage::Storage;

use super::recalculator::{recompute_all, spent_for, RecomputeOptions};

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
    ctx: &'a Context,
}

/// Input for creating a new budget
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    pub category: String,
    pub amount: Money,
    pub period: BudgetPeriod,
}

/// Partial update of a budget; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct BudgetPatch {
    pub category: Option<String>,
    pub amount: Option<Money>,
    pub period: Option<BudgetPeriod>,
}

impl BudgetPatch {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.amount.is_none() && self.period.is_none()
    }
}

/// Expense categories are matched case-insensitively on input
fn normalize_category(input: &str) -> String {
    canonical_category(TransactionType::Expense, input)
        .map(str::to_string)
        .unwrap_or_else(|| input.trim().to_string())
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage, ctx: &'a Context) -> Self {
        Self { storage, ctx }
    }

    fn options(&self) -> RecomputeOptions {
        RecomputeOptions::from(&self.ctx.config)
    }

    /// Create a budget; fails with `Duplicate` if the (category, period)
    /// pair already has one
    pub fn create(&self, input: CreateBudgetInput) -> TallyResult<Budget> {
        let mut budget = Budget::new(normalize_category(&input.category), input.amount, input.period);
        budget.user_id = self.storage.profile.get()?.map(|p| p.id);
        budget.validate()?;

        let transactions = self.storage.transactions.get_all()?;
        budget.set_spent(spent_for(&budget, &transactions, self.ctx.today(), self.options()));

        self.storage.budgets.insert(budget.clone())?;

        self.storage.log_create(
            EntityType::Budget,
            budget.id.to_string(),
            Some(format!("{} ({})", budget.category, budget.period)),
            &budget,
        );

        Ok(budget)
    }

    pub fn get(&self, id: BudgetId) -> TallyResult<Option<Budget>> {
        self.storage
            .budgets
            .get(id)?
            .map(|budget| self.with_current_spent(budget))
            .transpose()
    }

    /// Find a budget by full or short ID
    pub fn find(&self, identifier: &str) -> TallyResult<Option<Budget>> {
        self.storage
            .budgets
            .find(identifier)?
            .map(|budget| self.with_current_spent(budget))
            .transpose()
    }

    /// The stored `spent` only moves on writes, so reads recompute it
    /// against today's period window
    fn with_current_spent(&self, mut budget: Budget) -> TallyResult<Budget> {
        let transactions = self.storage.transactions.get_all()?;
        budget.set_spent(spent_for(&budget, &transactions, self.ctx.today(), self.options()));
        Ok(budget)
    }

    /// Find by ID, or fail with `NotFound`
    pub fn require(&self, identifier: &str) -> TallyResult<Budget> {
        self.find(identifier)?
            .ok_or_else(|| TallyError::budget_not_found(identifier))
    }

    /// All budgets with `spent` freshly recomputed
    pub fn list(&self) -> TallyResult<Vec<Budget>> {
        let budgets = self.storage.budgets.get_all()?;
        let transactions = self.storage.transactions.get_all()?;
        Ok(recompute_all(
            &budgets,
            &transactions,
            self.ctx.today(),
            self.options(),
        ))
    }

    /// Apply `patch`, re-checking the (category, period) slot
    pub fn update(&self, id: BudgetId, patch: BudgetPatch) -> TallyResult<Budget> {
        let before = self
            .storage
            .budgets
            .get(id)?
            .ok_or_else(|| TallyError::budget_not_found(id.to_string()))?;

        let mut budget = before.clone();
        if let Some(category) = &patch.category {
            budget.category = normalize_category(category);
        }
        if let Some(amount) = patch.amount {
            budget.amount = amount;
        }
        if let Some(period) = patch.period {
            budget.period = period;
        }
        budget.validate()?;

        let transactions = self.storage.transactions.get_all()?;
        budget.set_spent(spent_for(&budget, &transactions, self.ctx.today(), self.options()));
        budget.touch();

        self.storage.budgets.update(budget.clone())?;

        self.storage.log_update(
            EntityType::Budget,
            budget.id.to_string(),
            Some(format!("{} ({})", budget.category, budget.period)),
            &before,
            &budget,
        );

        Ok(budget)
    }

    pub fn delete(&self, id: BudgetId) -> TallyResult<Budget> {
        let budget = self.storage.budgets.delete(id)?;

        self.storage.log_delete(
            EntityType::Budget,
            budget.id.to_string(),
            Some(format!("{} ({})", budget.category, budget.period)),
            &budget,
        );

        Ok(budget)
    }

    /// Recompute every budget and persist if any `spent` changed
    ///
    /// Returns the number of budgets whose value moved.
    pub fn refresh(&self) -> TallyResult<usize> {
        let budgets = self.storage.budgets.get_all()?;
        let transactions = self.storage.transactions.get_all()?;
        let updated = recompute_all(&budgets, &transactions, self.ctx.today(), self.options());

        let changed = budgets
            .iter()
            .zip(&updated)
            .filter(|(old, new)| old.spent() != new.spent())
            .count();

        if changed > 0 {
            self.storage.budgets.replace_all(updated)?;
        }
        Ok(changed)
    }

    pub fn count(&self) -> TallyResult<usize> {
        self.storage.budgets.count()
    }
}
