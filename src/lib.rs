//! Tally - personal finance tracking from the terminal
//!
//! This library records income and expense transactions, keeps category
//! budgets in sync with them, and derives summaries for reporting.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Paths, application configuration and the injected [`config::Context`]
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, budgets, profile, settings, money)
//! - `storage`: Key-value persistence with one JSON blob per namespace
//! - `services`: Business logic, budget recalculation and analytics
//! - `audit`: Audit logging system
//! - `display`: Terminal formatting
//! - `export`: CSV, JSON and YAML export plus import
//! - `cli`: Command handlers for the `tally` binary
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use tally::config::{AppConfig, Context};
//! use tally::models::{BudgetPeriod, Money, TransactionType};
//! use tally::services::{BudgetService, CreateBudgetInput, CreateTransactionInput, TransactionService};
//! use tally::storage::Storage;
//!
//! let ctx = Context::fixed(AppConfig::default(), NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
//! let storage = Storage::in_memory("@tally")?;
//!
//! BudgetService::new(&storage, &ctx).create(CreateBudgetInput {
//!     category: "Food".into(),
//!     amount: Money::from_units(1000),
//!     period: BudgetPeriod::Monthly,
//! })?;
//!
//! TransactionService::new(&storage, &ctx).create(CreateTransactionInput {
//!     transaction_type: TransactionType::Expense,
//!     amount: Money::from_units(300),
//!     description: "Groceries".into(),
//!     category: "Food".into(),
//!     date: None,
//! })?;
//!
//! let budget = &BudgetService::new(&storage, &ctx).list()?[0];
//! assert_eq!(budget.utilization(), 30);
//! # Ok::<(), tally::TallyError>(())
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;
pub mod validation;

pub use error::{TallyError, TallyResult};
