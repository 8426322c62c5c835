// file: src/extractor/csv.rs
// description: flattens csv rows into comma-joined text lines
// reference: https://docs.rs/csv

use crate::error::{PipelineError, Result};
use crate::models::TextSegment;
use std::path::Path;
use tracing::debug;

/// Each record becomes one line with its fields rejoined by `,`. Quoting is
/// not re-applied, so cells containing commas become ambiguous.
pub fn extract(path: &Path) -> Result<Vec<TextSegment>> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| PipelineError::extraction(path, e))?;

    let mut segments = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| PipelineError::extraction(path, e))?;
        segments.push(TextSegment::plain(record.iter().collect::<Vec<_>>().join(",")));
    }

    debug!("Parsed CSV: {} ({} rows)", path.display(), segments.len());
    Ok(segments)
}
