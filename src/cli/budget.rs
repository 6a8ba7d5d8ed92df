//! Budget CLI commands

use clap::Subcommand;

use crate::config::Context;
use crate::display::{format_budget_details, format_budget_health, format_budget_table};
use crate::error::{TallyError, TallyResult};
use crate::models::{Budget, BudgetPeriod};
use crate::services::{AnalyticsService, BudgetPatch, BudgetService, CreateBudgetInput};
use crate::storage::Storage;

use super::{display_currency, parse_amount};

/// Budget subcommands
#[derive(Subcommand, Debug)]
pub enum BudgetCommands {
    /// Set a spending ceiling for an expense category
    Add {
        /// Expense category
        category: String,

        /// Ceiling per period
        amount: String,

        /// weekly, monthly or yearly
        #[arg(short, long, default_value = "monthly")]
        period: BudgetPeriod,
    },

    /// List budgets with current spending
    #[command(alias = "ls")]
    List,

    /// Show one budget
    Show {
        /// Budget ID (bud-xxxxxxxx) or category name
        budget: String,
    },

    /// Change a budget's category, amount or period
    Edit {
        /// Budget ID (bud-xxxxxxxx) or category name
        budget: String,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long)]
        amount: Option<String>,

        #[arg(short, long)]
        period: Option<BudgetPeriod>,
    },

    /// Delete a budget
    #[command(alias = "rm")]
    Delete {
        /// Budget ID (bud-xxxxxxxx) or category name
        budget: String,
    },

    /// Budget health: utilization and status of every budget
    Status,
}

/// Find a budget by ID, or by category when exactly one budget covers it
fn resolve_budget(service: &BudgetService<'_>, identifier: &str) -> TallyResult<Budget> {
    if let Some(budget) = service.find(identifier)? {
        return Ok(budget);
    }

    let mut matches: Vec<Budget> = service
        .list()?
        .into_iter()
        .filter(|b| b.category.eq_ignore_ascii_case(identifier.trim()))
        .collect();

    if matches.len() > 1 {
        return Err(TallyError::Validation(format!(
            "{} budgets cover '{}'. Use the budget ID instead.",
            matches.len(),
            identifier
        )));
    }
    matches
        .pop()
        .ok_or_else(|| TallyError::budget_not_found(identifier))
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    ctx: &Context,
    cmd: BudgetCommands,
) -> TallyResult<()> {
    let service = BudgetService::new(storage, ctx);
    let currency = display_currency(storage)?;
    let thresholds = &ctx.config.budget_health;

    match cmd {
        BudgetCommands::Add {
            category,
            amount,
            period,
        } => {
            let budget = service.create(CreateBudgetInput {
                category,
                amount: parse_amount(&amount)?,
                period,
            })?;
            println!(
                "Created {} budget {} for {}: {}",
                budget.period,
                budget.id,
                budget.category,
                currency.format(budget.amount)
            );
            if !budget.spent().is_zero() {
                println!(
                    "Already spent in the current {} window: {} ({}%)",
                    budget.period,
                    currency.format(budget.spent()),
                    budget.utilization()
                );
            }
        }

        BudgetCommands::List => {
            let budgets = service.list()?;
            print!("{}", format_budget_table(&budgets, thresholds, currency));
        }

        BudgetCommands::Show { budget } => {
            let budget = resolve_budget(&service, &budget)?;
            let window = budget.period.window_containing(ctx.today(), ctx.config.week_start);
            print!("{}", format_budget_details(&budget, thresholds, currency));
            println!("Window:     {}", window);
        }

        BudgetCommands::Edit {
            budget,
            category,
            amount,
            period,
        } => {
            let budget = resolve_budget(&service, &budget)?;
            let patch = BudgetPatch {
                category,
                amount: amount.map(|a| parse_amount(&a)).transpose()?,
                period,
            };

            if patch.is_empty() {
                println!("Nothing to change. Pass at least one of --category, --amount or --period.");
                return Ok(());
            }

            let updated = service.update(budget.id, patch)?;
            println!("Updated budget {}", updated.id);
            print!("{}", format_budget_details(&updated, thresholds, currency));
        }

        BudgetCommands::Delete { budget } => {
            let budget = resolve_budget(&service, &budget)?;
            let deleted = service.delete(budget.id)?;
            println!(
                "Deleted {} budget for {} ({})",
                deleted.period, deleted.category, deleted.id
            );
        }

        BudgetCommands::Status => {
            let report = AnalyticsService::new(storage, ctx).budget_health()?;
            print!("{}", format_budget_health(&report, thresholds, currency));
        }
    }

    Ok(())
}
