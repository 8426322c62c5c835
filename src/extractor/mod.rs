// file: src/extractor/mod.rs
// description: extractor registry mapping file extensions to text extractors
// reference: internal module structure

pub mod csv;
pub mod docx;
pub mod pdf;
pub mod pptx;

use crate::error::{PipelineError, Result};
use crate::models::document::normalized_extension;
use crate::models::{ExtractedDocument, TextSegment};
use std::path::Path;
use tracing::debug;

/// Converts one file into ordered text segments.
pub type ExtractorFn = fn(&Path) -> Result<Vec<TextSegment>>;

/// Extensions with a registered extractor. `doc` and `ppt` are aliases for the
/// OOXML extractors; no legacy binary conversion happens.
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["csv", "pdf", "doc", "docx", "ppt", "pptx"];

pub fn lookup(extension: &str) -> Option<ExtractorFn> {
    match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "csv" => Some(csv::extract as ExtractorFn),
        "pdf" => Some(pdf::extract as ExtractorFn),
        "doc" | "docx" => Some(docx::extract as ExtractorFn),
        "ppt" | "pptx" => Some(pptx::extract as ExtractorFn),
        _ => None,
    }
}

pub fn is_supported(extension: &str) -> bool {
    lookup(extension).is_some()
}

/// Runs the registered extractor for `path`.
pub fn extract_document(path: &Path) -> Result<ExtractedDocument> {
    let extension = normalized_extension(path);
    let extractor = lookup(&extension).ok_or_else(|| {
        PipelineError::UnsupportedFormat(format!(
            "no extractor for extension '{}' ({})",
            extension,
            path.display()
        ))
    })?;

    let segments = extractor(path)?;
    debug!(
        "Extracted {} segment(s) from {}",
        segments.len(),
        path.display()
    );
    Ok(ExtractedDocument::new(path, segments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_lookup_supported_set_case_insensitive() {
        for ext in SUPPORTED_EXTENSIONS {
            assert!(lookup(ext).is_some(), "{ext} should be supported");
            assert!(lookup(&ext.to_uppercase()).is_some());
        }
        assert!(lookup("PdF").is_some());
        assert!(lookup(".docx").is_some());
    }

    #[test]
    fn test_lookup_unknown_extensions() {
        for ext in ["txt", "md", "xlsx", "", "pdfx", "json"] {
            assert!(lookup(ext).is_none(), "{ext} should not be supported");
        }
    }

    #[test]
    fn test_extract_document_dispatches_on_extension() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Sheet.CSV");
        fs::write(&path, "a,b\nc,d\n").unwrap();

        let doc = extract_document(&path).unwrap();
        assert_eq!(doc.file_extension, "csv");
        assert_eq!(doc.text(), "a,b\nc,d");
    }

    #[test]
    fn test_extract_document_unknown_extension() {
        let result = extract_document(Path::new("notes.txt"));
        assert!(matches!(result, Err(PipelineError::UnsupportedFormat(_))));
    }
}
