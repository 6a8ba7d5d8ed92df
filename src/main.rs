use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use tally::cli::{
    handle_budget_command, handle_export_command, handle_import_command,
    handle_profile_command, handle_report_command, handle_settings_command,
    handle_transaction_command,
};
use tally::config::{AppConfig, Context, TallyPaths};
use tally::models::{HealthThresholds, WeekStart, EXPENSE_CATEGORIES, INCOME_CATEGORIES};
use tally::storage::Storage;

#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "Track income and expenses, budget by category, see where the money went",
    long_about = "Tally records income and expense transactions, keeps per-category \
                  spending ceilings up to date as you add, edit and delete entries, \
                  and summarizes spending by month, category and day."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and default configuration
    Init,

    /// Show paths and configuration, or change configuration values
    Config {
        /// Utilization percent at which a budget turns "warning"
        #[arg(long)]
        warning: Option<u32>,

        /// Utilization percent above which a budget is "over budget"
        #[arg(long)]
        over: Option<u32>,

        /// First day of weekly budget windows (sunday or monday)
        #[arg(long)]
        week_start: Option<WeekStart>,

        /// Ignore transactions dated after the end of a budget's window
        #[arg(long)]
        enforce_period_end: Option<bool>,
    },

    /// List the income and expense categories
    Categories,

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(tally::cli::TransactionCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(tally::cli::BudgetCommands),

    /// Spending summaries and breakdowns
    #[command(subcommand)]
    Report(tally::cli::ReportCommands),

    /// User profile commands
    #[command(subcommand)]
    Profile(tally::cli::ProfileCommands),

    /// Preference commands
    #[command(subcommand)]
    Settings(tally::cli::SettingsCommands),

    /// Export data to CSV, JSON or YAML
    #[command(subcommand)]
    Export(tally::cli::ExportCommands),

    /// Replace all data with a JSON or YAML export
    Import {
        /// Export file (.json, .yaml or .yml)
        file: PathBuf,
    },

    /// Delete all transactions, budgets, the profile and settings
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Show recent entries from the audit log
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },
}

/// Open the on-disk store for commands that read or write data
fn open(paths: &TallyPaths, config: AppConfig) -> Result<(Context, Storage)> {
    let ctx = Context::system(config);
    let storage = Storage::open(paths, &ctx.config)?;
    Ok((ctx, storage))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = TallyPaths::new()?;
    let mut config = AppConfig::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Init) => {
            paths.ensure_directories()?;
            config.save(&paths)?;
            println!("Initialized Tally at: {}", paths.base_dir().display());
            println!("  Config:    {}", paths.config_file().display());
            println!("  Data:      {}", paths.data_dir().display());
            println!("  Audit log: {}", paths.audit_log().display());
            println!();
            println!("Next: tally profile set --name <NAME> --email <EMAIL>");
        }
        Some(Commands::Config {
            warning,
            over,
            week_start,
            enforce_period_end,
        }) => {
            let changed = warning.is_some()
                || over.is_some()
                || week_start.is_some()
                || enforce_period_end.is_some();

            if changed {
                config.budget_health = HealthThresholds::new(
                    warning.unwrap_or(config.budget_health.warning_percent),
                    over.unwrap_or(config.budget_health.over_percent),
                );
                if let Some(week_start) = week_start {
                    config.week_start = week_start;
                }
                if let Some(enforce) = enforce_period_end {
                    config.enforce_period_end = enforce;
                }
                config.save(&paths)?;
                println!("Configuration saved");
                println!();
            }

            println!("Tally Configuration");
            println!("===================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Config file:    {}", paths.config_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Namespace:          {}", config.namespace);
            println!(
                "  Warning at:         {}%",
                config.budget_health.warning_percent
            );
            println!("  Over budget above:  {}%", config.budget_health.over_percent);
            println!("  Week starts on:     {}", config.week_start);
            println!("  Enforce period end: {}", config.enforce_period_end);
        }
        Some(Commands::Categories) => {
            println!("Expense categories:");
            for category in EXPENSE_CATEGORIES {
                println!("  {}", category);
            }
            println!();
            println!("Income categories:");
            for category in INCOME_CATEGORIES {
                println!("  {}", category);
            }
        }
        Some(Commands::Transaction(cmd)) => {
            let (ctx, storage) = open(&paths, config)?;
            handle_transaction_command(&storage, &ctx, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            let (ctx, storage) = open(&paths, config)?;
            handle_budget_command(&storage, &ctx, cmd)?;
        }
        Some(Commands::Report(cmd)) => {
            let (ctx, storage) = open(&paths, config)?;
            handle_report_command(&storage, &ctx, cmd)?;
        }
        Some(Commands::Profile(cmd)) => {
            let (_, storage) = open(&paths, config)?;
            handle_profile_command(&storage, cmd)?;
        }
        Some(Commands::Settings(cmd)) => {
            let (_, storage) = open(&paths, config)?;
            handle_settings_command(&storage, cmd)?;
        }
        Some(Commands::Export(cmd)) => {
            let (ctx, storage) = open(&paths, config)?;
            handle_export_command(&storage, &ctx, cmd)?;
        }
        Some(Commands::Import { file }) => {
            let (ctx, storage) = open(&paths, config)?;
            handle_import_command(&storage, &ctx, &file)?;
        }
        Some(Commands::Reset { yes }) => {
            if !yes {
                bail!("This deletes all data. Re-run with --yes to confirm.");
            }
            let (_, storage) = open(&paths, config)?;
            storage.clear_all()?;
            println!("All data cleared");
        }
        Some(Commands::Audit { count }) => {
            let (_, storage) = open(&paths, config)?;
            let entries = match storage.audit() {
                Some(logger) => logger.read_recent(count)?,
                None => Vec::new(),
            };
            if entries.is_empty() {
                println!("No audit entries yet.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        None => {
            println!("Tally - income, expenses and category budgets");
            println!();
            println!("Run 'tally --help' for usage information.");
            println!("Run 'tally transaction add 300 \"Lunch\" -c Food' to record an expense.");
        }
    }

    Ok(())
}
