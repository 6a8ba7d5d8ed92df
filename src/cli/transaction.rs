//! Transaction CLI commands

use clap::Subcommand;

use crate::config::Context;
use crate::display::{format_transaction_details, format_transaction_table};
use crate::error::TallyResult;
use crate::models::TransactionType;
use crate::services::{
    CreateTransactionInput, TransactionFilter, TransactionPatch, TransactionService,
};
use crate::storage::Storage;

use super::{display_currency, parse_amount, parse_date, parse_month_or_current};

/// Transaction subcommands
#[derive(Subcommand, Debug)]
pub enum TransactionCommands {
    /// Record an income or expense
    Add {
        /// Amount (e.g., "300" or "1,234.50")
        amount: String,

        /// What the money was for
        description: String,

        /// Category (see `tally categories`)
        #[arg(short, long)]
        category: String,

        /// income or expense (defaults to the configured default type)
        #[arg(short = 't', long = "type")]
        kind: Option<TransactionType>,

        /// Date (YYYY-MM-DD, today, yesterday)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List transactions, newest first
    #[command(alias = "ls")]
    List {
        /// Only income or only expense
        #[arg(short = 't', long = "type")]
        kind: Option<TransactionType>,

        #[arg(short, long)]
        category: Option<String>,

        /// Restrict to a month (YYYY-MM)
        #[arg(short, long, conflicts_with_all = ["from", "to"])]
        month: Option<String>,

        /// Start date (inclusive)
        #[arg(long)]
        from: Option<String>,

        /// End date (inclusive)
        #[arg(long)]
        to: Option<String>,

        /// Text to look for in descriptions
        #[arg(short, long)]
        search: Option<String>,

        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Show every match
        #[arg(long, conflicts_with = "limit")]
        all: bool,
    },

    /// Show one transaction
    Show {
        /// Transaction ID (txn-xxxxxxxx or full UUID)
        id: String,
    },

    /// Edit a transaction
    Edit {
        /// Transaction ID (txn-xxxxxxxx or full UUID)
        id: String,

        #[arg(short, long)]
        amount: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short = 't', long = "type")]
        kind: Option<TransactionType>,

        #[arg(short, long)]
        date: Option<String>,
    },

    /// Delete a transaction
    #[command(alias = "rm")]
    Delete {
        /// Transaction ID (txn-xxxxxxxx or full UUID)
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    ctx: &Context,
    cmd: TransactionCommands,
) -> TallyResult<()> {
    let service = TransactionService::new(storage, ctx);
    let currency = display_currency(storage)?;

    match cmd {
        TransactionCommands::Add {
            amount,
            description,
            category,
            kind,
            date,
        } => {
            let transaction_type = match kind {
                Some(kind) => kind,
                None => storage.settings.get()?.default_transaction_type,
            };
            let date = date.map(|d| parse_date(&d, ctx)).transpose()?;

            let txn = service.create(CreateTransactionInput {
                transaction_type,
                amount: parse_amount(&amount)?,
                description,
                category,
                date,
            })?;

            println!(
                "Added {} {} of {} [{}] on {}: {}",
                txn.transaction_type,
                txn.id,
                currency.format(txn.amount),
                txn.category,
                txn.date,
                txn.description
            );
        }

        TransactionCommands::List {
            kind,
            category,
            month,
            from,
            to,
            search,
            limit,
            all,
        } => {
            let mut filter = TransactionFilter::new();
            if let Some(kind) = kind {
                filter = filter.kind(kind);
            }
            if let Some(category) = category {
                filter = filter.category(category);
            }
            if let Some(month) = month {
                let window = parse_month_or_current(Some(&month), ctx)?;
                filter = filter.date_range(window.start, window.last_day());
            }
            if let Some(from) = from {
                filter.start_date = Some(parse_date(&from, ctx)?);
            }
            if let Some(to) = to {
                filter.end_date = Some(parse_date(&to, ctx)?);
            }
            if let Some(search) = search {
                filter = filter.search(search);
            }
            if !all {
                filter = filter.limit(limit);
            }

            let transactions = service.list(filter)?;
            print!("{}", format_transaction_table(&transactions, currency));
        }

        TransactionCommands::Show { id } => {
            let txn = service.require(&id)?;
            print!("{}", format_transaction_details(&txn, currency));
        }

        TransactionCommands::Edit {
            id,
            amount,
            description,
            category,
            kind,
            date,
        } => {
            let txn = service.require(&id)?;

            let patch = TransactionPatch {
                transaction_type: kind,
                amount: amount.map(|a| parse_amount(&a)).transpose()?,
                description,
                category,
                date: date.map(|d| parse_date(&d, ctx)).transpose()?,
            };

            if patch.is_empty() {
                println!("Nothing to change. Pass at least one of --amount, --description, --category, --type or --date.");
                return Ok(());
            }

            let updated = service.update(txn.id, patch)?;
            println!("Updated transaction {}", updated.id);
            print!("{}", format_transaction_details(&updated, currency));
        }

        TransactionCommands::Delete { id } => {
            let txn = service.require(&id)?;
            let deleted = service.delete(txn.id)?;
            println!(
                "Deleted transaction {}: {} {}",
                deleted.id,
                currency.format(deleted.amount),
                deleted.description
            );
        }
    }

    Ok(())
}
