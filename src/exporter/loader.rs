// file: src/exporter/loader.rs
// description: reloads an exported dataset file into a table
// reference: internal module structure

use crate::error::Result;
use crate::exporter::{ExportFormat, csv, jsonl, parquet};
use crate::models::Table;
use std::path::Path;
use tracing::debug;

/// Reads a `.jsonl`, `.csv` or `.parquet` file chosen by extension.
pub fn load_table(path: &Path) -> Result<Table> {
    let format = ExportFormat::from_path(path)?;

    let table = match format {
        ExportFormat::Jsonl => jsonl::read(path)?,
        ExportFormat::Csv => csv::read(path)?,
        ExportFormat::Parquet => parquet::read(path)?,
    };

    debug!(
        "Loaded {} row(s), {} column(s) from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}
