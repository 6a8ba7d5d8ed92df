//! User preferences
//!
//! A flat preferences record. Every field has a default, and fields missing
//! from the stored blob take their default on read.

use serde::{Deserialize, Serialize};

use super::currency::Currency;
use super::transaction::TransactionType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub currency: Currency,

    /// Type preselected when adding a transaction
    pub default_transaction_type: TransactionType,

    pub notifications_enabled: bool,

    pub dark_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: Currency::Inr,
            default_transaction_type: TransactionType::Expense,
            notifications_enabled: true,
            dark_mode: false,
        }
    }
}

/// Partial update of [`Settings`]; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub currency: Option<Currency>,
    pub default_transaction_type: Option<TransactionType>,
    pub notifications_enabled: Option<bool>,
    pub dark_mode: Option<bool>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.currency.is_none()
            && self.default_transaction_type.is_none()
            && self.notifications_enabled.is_none()
            && self.dark_mode.is_none()
    }

    pub fn apply(&self, settings: &mut Settings) {
        if let Some(currency) = self.currency {
            settings.currency = currency;
        }
        if let Some(kind) = self.default_transaction_type {
            settings.default_transaction_type = kind;
        }
        if let Some(enabled) = self.notifications_enabled {
            settings.notifications_enabled = enabled;
        }
        if let Some(dark) = self.dark_mode {
            settings.dark_mode = dark;
        }
    }
}
