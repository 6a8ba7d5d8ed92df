//! Display formatting for terminal output
//!
//! Tables for transactions and budgets, text layouts for reports, and
//! detail views. Money is always rendered through a [`Currency`](crate::models::Currency).

pub mod budget;
pub mod profile;
pub mod report;
pub mod transaction;

pub use budget::{format_budget_details, format_budget_health, format_budget_table};
pub use profile::{format_profile, format_settings};
pub use report::{format_breakdown, format_calendar, format_summary, format_trend};
pub use transaction::{format_transaction_details, format_transaction_table};
