//! Budget spending recomputation
//!
//! A budget's `spent` is derived, never edited: it is the sum of expense
//! amounts in the budget's category whose date falls in the budget's
//! current window. Every recompute is a full pass over the transactions.

use chrono::NaiveDate;

use crate::config::AppConfig;
use crate::models::{Budget, Money, Transaction, WeekStart};

/// Knobs for window selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecomputeOptions {
    pub week_start: WeekStart,

    /// Ignore transactions dated on or after the window end
    pub enforce_period_end: bool,
}

impl Default for RecomputeOptions {
    fn default() -> Self {
        Self {
            week_start: WeekStart::Sunday,
            enforce_period_end: true,
        }
    }
}

impl From<&AppConfig> for RecomputeOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            week_start: config.week_start,
            enforce_period_end: config.enforce_period_end,
        }
    }
}

/// Spending that counts toward `budget` as of `today`
pub fn spent_for(
    budget: &Budget,
    transactions: &[Transaction],
    today: NaiveDate,
    options: RecomputeOptions,
) -> Money {
    let window = budget.period.window_containing(today, options.week_start);
    transactions
        .iter()
        .filter(|t| t.is_expense() && t.category == budget.category)
        .filter(|t| t.date >= window.start)
        .filter(|t| !options.enforce_period_end || t.date < window.end)
        .map(|t| t.amount)
        .sum()
}

/// Copy of `budgets` with every `spent` recomputed; order and all other
/// fields are kept
pub fn recompute_all(
    budgets: &[Budget],
    transactions: &[Transaction],
    today: NaiveDate,
    options: RecomputeOptions,
) -> Vec<Budget> {
    budgets
        .iter()
        .map(|budget| {
            let mut updated = budget.clone();
            updated.set_spent(spent_for(budget, transactions, today, options));
            updated
        })
        .collect()
}
