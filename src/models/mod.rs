//! Core data models for Tally
//!
//! Transactions, budgets, the user profile and preferences, plus the value
//! types they are built from (money, currencies, periods, IDs).

pub mod budget;
pub mod category;
pub mod currency;
pub mod ids;
pub mod money;
pub mod period;
pub mod settings;
pub mod transaction;
pub mod user;

pub use budget::{utilization, Budget, BudgetStatus, HealthThresholds};
pub use category::{canonical_category, categories_for, EXPENSE_CATEGORIES, INCOME_CATEGORIES};
pub use currency::Currency;
pub use ids::{BudgetId, TransactionId, UserId};
pub use money::Money;
pub use period::{parse_month, BudgetPeriod, PeriodWindow, WeekStart};
pub use settings::{Settings, SettingsPatch};
pub use transaction::{Transaction, TransactionType};
pub use user::UserProfile;
