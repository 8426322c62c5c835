// file: src/models/document.rs
// description: extracted document model with page and slide segment markers
// reference: internal data structures

use std::fmt;
use std::path::{Path, PathBuf};

/// Provenance of a text segment, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentMarker {
    Page(usize),
    Slide(usize),
}

impl fmt::Display for SegmentMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(index) => write!(f, "--- Page {} ---", index),
            Self::Slide(index) => write!(f, "--- Slide {} ---", index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    pub marker: Option<SegmentMarker>,
    pub text: String,
}

impl TextSegment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            marker: None,
            text: text.into(),
        }
    }

    pub fn page(index: usize, text: impl Into<String>) -> Self {
        Self {
            marker: Some(SegmentMarker::Page(index)),
            text: text.into(),
        }
    }

    pub fn slide(index: usize, text: impl Into<String>) -> Self {
        Self {
            marker: Some(SegmentMarker::Slide(index)),
            text: text.into(),
        }
    }

    fn render(&self) -> String {
        match self.marker {
            Some(marker) => format!("{}\n{}", marker, self.text),
            None => self.text.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub source_path: PathBuf,
    pub source_filename: String,
    pub file_extension: String,
    pub segments: Vec<TextSegment>,
}

impl ExtractedDocument {
    pub fn new(source_path: &Path, segments: Vec<TextSegment>) -> Self {
        Self {
            source_path: source_path.to_path_buf(),
            source_filename: file_name(source_path),
            file_extension: normalized_extension(source_path),
            segments,
        }
    }

    /// Linear text blob handed to the prompt.
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(TextSegment::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Filename without its extension, used to ground citations in the prompt.
    pub fn source_identifier(&self) -> String {
        source_identifier(&self.source_path)
    }
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

pub fn source_identifier(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

pub fn normalized_extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
