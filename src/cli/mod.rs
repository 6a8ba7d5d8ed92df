//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Handlers print to
//! stdout and return errors to `main` for reporting.

pub mod budget;
pub mod export;
pub mod profile;
pub mod report;
pub mod settings;
pub mod transaction;

pub use budget::{handle_budget_command, BudgetCommands};
pub use export::{handle_export_command, handle_import_command, ExportCommands};
pub use profile::{handle_profile_command, ProfileCommands};
pub use report::{handle_report_command, ReportCommands};
pub use settings::{handle_settings_command, SettingsCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::{Datelike, Duration, NaiveDate};

use crate::config::Context;
use crate::error::{TallyError, TallyResult};
use crate::models::{parse_month, Currency, Money, PeriodWindow};
use crate::storage::Storage;

/// Parse a user-entered amount such as `1,234.50` or `₹300`
pub fn parse_amount(input: &str) -> TallyResult<Money> {
    Money::parse(input)
        .map_err(|e| TallyError::Validation(format!("Invalid amount '{}': {}", input, e)))
}

/// Parse `today`, `yesterday` or `YYYY-MM-DD`
pub fn parse_date(input: &str, ctx: &Context) -> TallyResult<NaiveDate> {
    match input.trim().to_lowercase().as_str() {
        "today" => Ok(ctx.today()),
        "yesterday" => Ok(ctx.today() - Duration::days(1)),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d").map_err(|_| {
            TallyError::Validation(format!(
                "Invalid date '{}'. Use YYYY-MM-DD, today or yesterday",
                input
            ))
        }),
    }
}

/// Parse `YYYY-MM`, defaulting to the current month
pub fn parse_month_or_current(input: Option<&str>, ctx: &Context) -> TallyResult<PeriodWindow> {
    match input {
        Some(month) => parse_month(month).ok_or_else(|| {
            TallyError::Validation(format!("Invalid month '{}'. Use YYYY-MM", month))
        }),
        None => {
            let today = ctx.today();
            PeriodWindow::month(today.year(), today.month())
                .ok_or_else(|| TallyError::Validation("Current month is out of range".into()))
        }
    }
}

/// Currency used to render amounts, from settings
pub fn display_currency(storage: &Storage) -> TallyResult<Currency> {
    Ok(storage.settings.get()?.currency)
}
