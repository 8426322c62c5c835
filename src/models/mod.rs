// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod document;
pub mod qa_pair;
pub mod table;

pub use document::{ExtractedDocument, SegmentMarker, TextSegment};
pub use qa_pair::{QaCandidate, QaPair};
pub use table::{Row, Table};
