//! Transaction model
//!
//! An income or expense entry with a positive amount, a short description
//! and a category drawn from the list for its type.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::category::is_valid_category;
use super::ids::{TransactionId, UserId};
use super::money::Money;
use crate::validation::{Rule, ValidationError, ValidationErrors, Validator};

/// Maximum description length in characters
pub const MAX_DESCRIPTION_LEN: usize = 100;

/// Largest amount accepted for a single entry (one billion units)
pub const MAX_AMOUNT: Money = Money::from_units(1_000_000_000);

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Ok(Self::Income),
            "expense" | "out" => Ok(Self::Expense),
            other => Err(format!("Unknown transaction type: {}", other)),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Always positive; direction comes from `transaction_type`
    pub amount: Money,

    pub description: String,

    pub category: String,

    pub date: NaiveDate,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Owner of the entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        transaction_type: TransactionType,
        amount: Money,
        description: impl Into<String>,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            amount,
            description: description.into(),
            category: category.into(),
            date,
            transaction_type,
            user_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    /// Amount with the sign of its direction (income positive, expense negative)
    pub fn signed_amount(&self) -> Money {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }

    /// Mark the transaction as modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Validate every field, collecting all failures
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        transaction_validator().validate(self)
    }
}

fn transaction_validator() -> Validator<'static, Transaction> {
    Validator::new(vec![
        Rule::new(
            |t: &Transaction| t.amount.is_positive(),
            ValidationError::NotPositive { field: "amount" },
        ),
        Rule::new(
            |t: &Transaction| t.amount <= MAX_AMOUNT,
            ValidationError::TooLarge { field: "amount" },
        ),
        Rule::new(
            |t: &Transaction| !t.description.trim().is_empty(),
            ValidationError::Required {
                field: "description",
            },
        ),
        Rule::new(
            |t: &Transaction| t.description.trim().chars().count() <= MAX_DESCRIPTION_LEN,
            ValidationError::TooLong {
                field: "description",
                max: MAX_DESCRIPTION_LEN,
            },
        ),
        Rule::dynamic(|t: &Transaction| {
            if is_valid_category(t.transaction_type, &t.category) {
                None
            } else {
                Some(ValidationError::UnknownCategory {
                    category: t.category.clone(),
                    kind: t.transaction_type.as_str(),
                })
            }
        }),
    ])
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} [{}] {}",
            self.date, self.transaction_type, self.amount, self.category, self.description
        )
    }
}
