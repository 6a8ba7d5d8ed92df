//! Budget model
//!
//! A spending ceiling for one expense category over a weekly, monthly or
//! yearly window. `spent` is derived from the transaction list and is only
//! ever written by the recalculator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::is_valid_category;
use super::ids::{BudgetId, UserId};
use super::money::Money;
use super::period::BudgetPeriod;
use super::transaction::{TransactionType, MAX_AMOUNT};
use crate::validation::{Rule, ValidationError, ValidationErrors, Validator};

/// A category budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,

    /// Expense category this budget covers
    pub category: String,

    /// Budget ceiling for one period
    pub amount: Money,

    /// Spending inside the current window (derived)
    #[serde(default)]
    spent: Money,

    pub period: BudgetPeriod,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Create a new budget with nothing spent yet
    pub fn new(category: impl Into<String>, amount: Money, period: BudgetPeriod) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            category: category.into(),
            amount,
            spent: Money::zero(),
            period,
            user_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn spent(&self) -> Money {
        self.spent
    }

    /// Replace the cached spending total; only the recalculator calls this
    pub(crate) fn set_spent(&mut self, spent: Money) {
        self.spent = spent;
    }

    /// Amount left before hitting the ceiling (negative when over)
    pub fn remaining(&self) -> Money {
        self.amount - self.spent
    }

    /// Percentage of the ceiling used, rounded to the nearest integer
    pub fn utilization(&self) -> i64 {
        utilization(self.spent, self.amount)
    }

    pub fn status(&self, thresholds: &HealthThresholds) -> BudgetStatus {
        thresholds.classify(self.utilization())
    }

    /// Check whether this budget covers the same (category, period) pair
    pub fn same_slot(&self, category: &str, period: BudgetPeriod) -> bool {
        self.category == category && self.period == period
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        budget_validator().validate(self)
    }
}

fn budget_validator() -> Validator<'static, Budget> {
    Validator::new(vec![
        Rule::new(
            |b: &Budget| b.amount.is_positive(),
            ValidationError::NotPositive { field: "amount" },
        ),
        Rule::new(
            |b: &Budget| b.amount <= MAX_AMOUNT,
            ValidationError::TooLarge { field: "amount" },
        ),
        Rule::dynamic(|b: &Budget| {
            if is_valid_category(TransactionType::Expense, &b.category) {
                None
            } else {
                Some(ValidationError::UnknownCategory {
                    category: b.category.clone(),
                    kind: TransactionType::Expense.as_str(),
                })
            }
        }),
    ])
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {} of {}",
            self.category, self.period, self.spent, self.amount
        )
    }
}

/// `round(spent / amount * 100)`, rounding halves away from zero
///
/// A zero ceiling reports 0% with nothing spent and saturates otherwise.
pub fn utilization(spent: Money, amount: Money) -> i64 {
    if !amount.is_positive() {
        return if spent.is_positive() { i64::MAX } else { 0 };
    }
    (spent.cents() as f64 / amount.cents() as f64 * 100.0).round() as i64
}

/// Budget health band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetStatus {
    OnTrack,
    Warning,
    OverBudget,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTrack => "on-track",
            Self::Warning => "warning",
            Self::OverBudget => "over-budget",
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Utilization cut-offs for the health bands
///
/// `utilization > over_percent` is over budget,
/// `warning_percent < utilization <= over_percent` is a warning,
/// anything lower is on track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthThresholds {
    #[serde(default = "default_warning_percent")]
    pub warning_percent: u32,

    #[serde(default = "default_over_percent")]
    pub over_percent: u32,
}

fn default_warning_percent() -> u32 {
    70
}

fn default_over_percent() -> u32 {
    100
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            warning_percent: default_warning_percent(),
            over_percent: default_over_percent(),
        }
    }
}

impl HealthThresholds {
    pub fn new(warning_percent: u32, over_percent: u32) -> Self {
        Self {
            warning_percent,
            over_percent,
        }
    }

    pub fn classify(&self, utilization: i64) -> BudgetStatus {
        if utilization > self.over_percent as i64 {
            BudgetStatus::OverBudget
        } else if utilization > self.warning_percent as i64 {
            BudgetStatus::Warning
        } else {
            BudgetStatus::OnTrack
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new(vec![Rule::new(
            |t: &HealthThresholds| t.warning_percent < t.over_percent,
            ValidationError::InvalidThresholds {
                warning: self.warning_percent,
                over: self.over_percent,
            },
        )])
        .validate(self)
    }
}
