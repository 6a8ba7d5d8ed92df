//! Service layer for Tally
//!
//! Business logic on top of the storage layer: validation, budget
//! recomputation after each mutation, and aggregation for reports.

pub mod analytics;
pub mod budget;
pub mod profile;
pub mod recalculator;
pub mod settings;
pub mod transaction;

pub use analytics::{
    AnalyticsService, BudgetHealthReport, CategoryTotal, PeriodSummary, MAX_TREND_MONTHS,
};
pub use budget::{BudgetPatch, BudgetService, CreateBudgetInput};
pub use profile::{ProfileInput, ProfileService};
pub use recalculator::{recompute_all, RecomputeOptions};
pub use settings::SettingsService;
pub use transaction::{
    CreateTransactionInput, TransactionFilter, TransactionPatch, TransactionService,
};
