// file: src/extractor/docx.rs
// description: paragraph text extraction from word documents
// reference: https://docs.rs/docx-rs

use crate::error::{PipelineError, Result};
use crate::models::TextSegment;
use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild, read_docx};
use std::fs;
use std::path::Path;
use tracing::debug;

/// One segment per non-empty body paragraph. Word has no page boundaries at
/// this level, so no markers are emitted.
pub fn extract(path: &Path) -> Result<Vec<TextSegment>> {
    let bytes = fs::read(path).map_err(|e| PipelineError::extraction(path, e))?;
    let docx = read_docx(&bytes).map_err(|e| PipelineError::extraction(path, format!("{:?}", e)))?;

    let segments: Vec<TextSegment> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
            _ => None,
        })
        .filter(|text| !text.is_empty())
        .map(TextSegment::plain)
        .collect();

    debug!("Parsed DOCX: {} ({} paragraphs)", path.display(), segments.len());
    Ok(segments)
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    push_children_text(&paragraph.children, &mut text);
    text
}

/// Hyperlinks carry their own runs, so their text is read in place.
fn push_children_text(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_children_text(&link.children, text),
            _ => {}
        }
    }
}
