//! CLI commands for data export and import

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::config::Context;
use crate::error::{TallyError, TallyResult};
use crate::export::{
    export_budgets_csv, export_full_json, export_full_yaml, export_transactions_csv,
    import_from_json, import_from_yaml, FullExport,
};
use crate::services::{BudgetService, TransactionFilter, TransactionService};
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export transactions (or budgets) to CSV
    Csv {
        /// Output file path
        output: PathBuf,

        /// Export budgets with their current spending instead of transactions
        #[arg(long)]
        budgets: bool,
    },

    /// Export all data to JSON (readable by `tally import`)
    Json {
        /// Output file path
        output: PathBuf,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Export all data to YAML (readable by `tally import`)
    Yaml {
        /// Output file path
        output: PathBuf,
    },

    /// Show what an export would contain without writing files
    Info,
}

fn create_output(output: &Path) -> TallyResult<BufWriter<File>> {
    let file = File::create(output).map_err(|e| {
        TallyError::Export(format!(
            "Failed to create file {}: {}",
            output.display(),
            e
        ))
    })?;
    Ok(BufWriter::new(file))
}

fn finish(mut writer: BufWriter<File>, output: &Path) -> TallyResult<()> {
    writer.flush().map_err(|e| {
        TallyError::Export(format!("Failed to write {}: {}", output.display(), e))
    })
}

/// Handle export commands
pub fn handle_export_command(
    storage: &Storage,
    ctx: &Context,
    cmd: ExportCommands,
) -> TallyResult<()> {
    match cmd {
        ExportCommands::Csv { output, budgets } => {
            let mut writer = create_output(&output)?;
            if budgets {
                let budgets = BudgetService::new(storage, ctx).list()?;
                export_budgets_csv(&budgets, &ctx.config.budget_health, &mut writer)?;
                finish(writer, &output)?;
                println!("Exported {} budgets to: {}", budgets.len(), output.display());
            } else {
                let transactions =
                    TransactionService::new(storage, ctx).list(TransactionFilter::new())?;
                export_transactions_csv(&transactions, &mut writer)?;
                finish(writer, &output)?;
                println!(
                    "Exported {} transactions to: {}",
                    transactions.len(),
                    output.display()
                );
            }
        }

        ExportCommands::Json { output, pretty } => {
            let mut writer = create_output(&output)?;
            export_full_json(storage, ctx, &mut writer, pretty)?;
            finish(writer, &output)?;
            println!("Full data store exported to: {}", output.display());
        }

        ExportCommands::Yaml { output } => {
            let mut writer = create_output(&output)?;
            export_full_yaml(storage, ctx, &mut writer)?;
            finish(writer, &output)?;
            println!("Full data store exported to: {}", output.display());
        }

        ExportCommands::Info => {
            let export = FullExport::from_storage(storage, ctx)?;

            println!("Export Information");
            println!("==================\n");
            println!("Schema Version: {}", export.schema_version);
            println!("App Version:    {}", export.app_version);
            println!();
            println!("Data Summary:");
            println!("  Transactions:  {}", export.metadata.transaction_count);
            println!("  Budgets:       {}", export.metadata.budget_count);
            println!(
                "  Profile:       {}",
                if export.profile.is_some() { "yes" } else { "no" }
            );

            if let (Some(earliest), Some(latest)) = (
                &export.metadata.earliest_transaction,
                &export.metadata.latest_transaction,
            ) {
                println!();
                println!("Transaction Date Range: {} to {}", earliest, latest);
            }
        }
    }

    Ok(())
}

/// Replace all stored data with the contents of a JSON or YAML export
pub fn handle_import_command(storage: &Storage, ctx: &Context, file: &Path) -> TallyResult<()> {
    let contents = std::fs::read_to_string(file).map_err(|e| {
        TallyError::Import(format!("Failed to read {}: {}", file.display(), e))
    })?;

    let is_yaml = file
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    let export = if is_yaml {
        import_from_yaml(&contents)?
    } else {
        import_from_json(&contents)?
    };

    let summary = export.restore(storage, ctx)?;
    println!("Imported from {}", file.display());
    println!("  Transactions:  {}", summary.transactions);
    println!("  Budgets:       {}", summary.budgets);
    println!(
        "  Profile:       {}",
        if summary.profile { "yes" } else { "no" }
    );

    Ok(())
}
