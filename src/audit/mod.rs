//! Audit logging for Tally
//!
//! Every create, update and delete is recorded with before/after values in
//! an append-only JSONL file (`audit.log` in the base directory).
//!
//! - `AuditEntry`: one operation on one entity
//! - `AuditLogger`: appends entries and reads them back
//! - `generate_diff`: top-level field diff used for update summaries

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
