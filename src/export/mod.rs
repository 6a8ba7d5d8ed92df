//! Export module for Tally
//!
//! - CSV: transactions and budgets, spreadsheet-compatible
//! - JSON: full data store export, also the import format
//! - YAML: full data store export for human-readable backups

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_budgets_csv, export_transactions_csv};
pub use json::{export_full_json, import_from_json, FullExport, RestoreSummary, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_full_yaml, import_from_yaml};
