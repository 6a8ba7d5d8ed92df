//! CLI commands for reports

use chrono::{Datelike, Duration};
use clap::Subcommand;

use crate::config::Context;
use crate::display::{format_breakdown, format_calendar, format_summary, format_trend};
use crate::error::{TallyError, TallyResult};
use crate::models::{PeriodWindow, TransactionType};
use crate::services::{AnalyticsService, MAX_TREND_MONTHS};
use crate::storage::Storage;

use super::{display_currency, parse_date, parse_month_or_current};

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Income, expenses, net and savings rate for a month
    Summary {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Totals per category, largest first
    #[command(alias = "breakdown")]
    Categories {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long, conflicts_with_all = ["from", "to"])]
        month: Option<String>,

        /// Start date (inclusive); requires --to
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// End date (inclusive); requires --from
        #[arg(long, requires = "from")]
        to: Option<String>,

        /// Break down income instead of expenses
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: TransactionType,
    },

    /// Calendar of a month with the days that had activity
    Calendar {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Month-by-month income and expenses
    Trend {
        /// Number of months, ending with the current one (1-120)
        #[arg(short = 'n', long, default_value = "6", value_parser = clap::value_parser!(u32).range(1..=MAX_TREND_MONTHS as i64))]
        months: u32,
    },
}

/// Handle a report command
pub fn handle_report_command(
    storage: &Storage,
    ctx: &Context,
    cmd: ReportCommands,
) -> TallyResult<()> {
    let analytics = AnalyticsService::new(storage, ctx);
    let currency = display_currency(storage)?;

    match cmd {
        ReportCommands::Summary { month } => {
            let window = parse_month_or_current(month.as_deref(), ctx)?;
            let summary = analytics.summary(window)?;
            let title = format!("Summary for {}", window.start.format("%B %Y"));
            print!("{}", format_summary(&title, &summary, currency));
        }

        ReportCommands::Categories {
            month,
            from,
            to,
            kind,
        } => {
            let window = match (from, to) {
                (Some(from), Some(to)) => {
                    let start = parse_date(&from, ctx)?;
                    let last = parse_date(&to, ctx)?;
                    if last < start {
                        return Err(TallyError::Validation(
                            "--to must not be before --from".into(),
                        ));
                    }
                    PeriodWindow::new(start, last + Duration::days(1))
                }
                _ => parse_month_or_current(month.as_deref(), ctx)?,
            };

            let rows = analytics.category_breakdown(window, kind)?;
            let label = match kind {
                TransactionType::Expense => "Expenses",
                TransactionType::Income => "Income",
            };
            let title = format!("{} by category, {}", label, window);
            print!("{}", format_breakdown(&title, &rows, currency));
        }

        ReportCommands::Calendar { month } => {
            let window = parse_month_or_current(month.as_deref(), ctx)?;
            let days = analytics.calendar_month(window.start.year(), window.start.month())?;
            print!(
                "{}",
                format_calendar(window, &days, ctx.config.week_start, currency)
            );
        }

        ReportCommands::Trend { months } => {
            let trend = analytics.monthly_trend(months)?;
            print!("{}", format_trend(&trend, currency));
        }
    }

    Ok(())
}
