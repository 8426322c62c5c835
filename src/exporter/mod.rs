// file: src/exporter/mod.rs
// description: dataset export formats, timestamped naming and format dispatch
// reference: internal module structure

pub mod csv;
pub mod jsonl;
pub mod loader;
pub mod parquet;

use crate::error::{PipelineError, Result};
use crate::models::Table;
use chrono::Local;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

pub use loader::load_table;

const DEFAULT_BASE_NAME: &str = "output";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Jsonl,
    Csv,
    Parquet,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [Self::Jsonl, Self::Csv, Self::Parquet];

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jsonl => "jsonl",
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }

    /// Format implied by a file's extension, case-insensitive.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        extension.parse()
    }
}

impl FromStr for ExportFormat {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jsonl" => Ok(Self::Jsonl),
            "csv" => Ok(Self::Csv),
            "parquet" => Ok(Self::Parquet),
            other => Err(PipelineError::UnsupportedFormat(format!(
                "dataset format '{}' (expected jsonl, csv or parquet)",
                other
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Local time stamp used in export file names.
pub fn timestamp_suffix() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// `{dir}/{base}_{stamp}.{ext}`. The base is the output's file stem; an
/// empty output, a trailing separator or an existing directory means `output`
/// inside that directory. Any extension the caller gave is replaced.
pub fn resolve_export_path(output: &Path, format: ExportFormat, stamp: &str) -> PathBuf {
    let raw = output.as_os_str().to_string_lossy();
    let names_directory = raw.is_empty()
        || raw.ends_with('/')
        || raw.ends_with(std::path::MAIN_SEPARATOR)
        || output.is_dir();

    let (dir, base) = if names_directory {
        (output.to_path_buf(), DEFAULT_BASE_NAME.to_string())
    } else {
        let base = output
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_NAME.to_string());
        let dir = output.parent().map(Path::to_path_buf).unwrap_or_default();
        (dir, base)
    };

    dir.join(format!("{}_{}.{}", base, stamp, format.extension()))
}

pub struct DatasetExporter;

impl DatasetExporter {
    /// Writes `table` to `path` in `format`, replacing any existing file.
    pub fn export(table: &Table, path: &Path, format: ExportFormat) -> Result<()> {
        match format {
            ExportFormat::Jsonl => jsonl::write(table, path)?,
            ExportFormat::Csv => csv::write(table, path)?,
            ExportFormat::Parquet => parquet::write(table, path)?,
        }

        info!(
            "Exported {} row(s) as {} to {}",
            table.len(),
            format,
            path.display()
        );
        Ok(())
    }
}
