// file: src/models/qa_pair.rs
// description: question/answer records produced by the LLM and enriched with provenance
// reference: internal data structures

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A validated element of an LLM response, before file metadata is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaCandidate {
    pub question: String,
    pub thought: String,
    pub answer: String,
    pub model: String,
}

/// One row of the output dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub thought: String,
    pub answer: String,
    pub model: String,
    pub filename: String,
    pub page_number: Option<u32>,
    pub slide_index: Option<u32>,
    /// Epoch seconds at enrichment time.
    pub timestamp: f64,
}

impl QaPair {
    pub fn enrich(candidate: QaCandidate, filename: &str) -> Self {
        Self::enrich_at(candidate, filename, epoch_seconds())
    }

    pub fn enrich_at(candidate: QaCandidate, filename: &str, timestamp: f64) -> Self {
        Self {
            question: candidate.question,
            thought: candidate.thought,
            answer: candidate.answer,
            model: candidate.model,
            filename: filename.to_string(),
            // TODO: map segment markers to answers once the prompt asks for a page/slide citation
            page_number: None,
            slide_index: None,
            timestamp,
        }
    }
}

pub fn epoch_seconds() -> f64 {
    let now = Utc::now();
    now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1_000_000.0
}
