//! YAML export
//!
//! The same [`FullExport`] structure as JSON, for human-readable backups.

use std::io::Write;

use crate::config::Context;
use crate::error::{TallyError, TallyResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

fn export_err(e: impl std::fmt::Display) -> TallyError {
    TallyError::Export(e.to_string())
}

/// Export the full data store to YAML
pub fn export_full_yaml<W: Write>(
    storage: &Storage,
    ctx: &Context,
    writer: &mut W,
) -> TallyResult<()> {
    let export = FullExport::from_storage(storage, ctx)?;

    writeln!(writer, "# Tally data export").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, &export).map_err(export_err)?;

    Ok(())
}

/// Parse and validate a YAML export
pub fn import_from_yaml(yaml_str: &str) -> TallyResult<FullExport> {
    let export: FullExport =
        serde_yaml::from_str(yaml_str).map_err(|e| TallyError::Import(e.to_string()))?;

    export.validate().map_err(TallyError::Import)?;

    Ok(export)
}
