// file: src/extractor/pdf.rs
// description: per-page pdf text extraction with page markers
// reference: https://docs.rs/lopdf

use crate::error::{PipelineError, Result};
use crate::models::TextSegment;
use lopdf::Document;
use std::path::Path;
use tracing::{debug, warn};

pub fn extract(path: &Path) -> Result<Vec<TextSegment>> {
    let document = Document::load(path).map_err(|e| PipelineError::extraction(path, e))?;
    let pages = document.get_pages();

    let mut texts = Vec::with_capacity(pages.len());
    for page_number in pages.keys().copied() {
        match document.extract_text(&[page_number]) {
            Ok(text) => texts.push((page_number, text)),
            Err(e) => warn!(
                "Could not extract text from page {} of {}: {}",
                page_number,
                path.display(),
                e
            ),
        }
    }

    let segments = page_segments(texts);
    debug!(
        "Parsed PDF: {} ({} of {} pages with text)",
        path.display(),
        segments.len(),
        pages.len()
    );
    Ok(segments)
}

/// Pages without text are dropped rather than kept as empty segments.
fn page_segments(pages: impl IntoIterator<Item = (u32, String)>) -> Vec<TextSegment> {
    pages
        .into_iter()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(page_number, text)| TextSegment::page(page_number as usize, text.trim_end()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SegmentMarker;
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    /// One page per entry, `None` leaves the content stream empty.
    fn write_pdf(path: &Path, pages: &[Option<&str>]) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let kids: Vec<Object> = pages
            .iter()
            .map(|text| {
                let operations = match text {
                    Some(text) => vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 24.into()]),
                        Operation::new("Td", vec![72.into(), 720.into()]),
                        Operation::new("Tj", vec![Object::string_literal(*text)]),
                        Operation::new("ET", vec![]),
                    ],
                    None => vec![],
                };
                let content = Content { operations }.encode().unwrap();
                let content_id = doc.add_object(Stream::new(dictionary! {}, content));
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "Contents" => content_id,
                    "Resources" => resources_id,
                })
                .into()
            })
            .collect();

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_empty_pages_omitted_and_indices_kept() {
        let segments = page_segments(vec![
            (1, "Intro\n".to_string()),
            (2, "   \n".to_string()),
            (3, "Safety notes".to_string()),
        ]);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].marker, Some(SegmentMarker::Page(1)));
        assert_eq!(segments[0].text, "Intro");
        assert_eq!(segments[1].marker, Some(SegmentMarker::Page(3)));
    }

    #[test]
    fn test_malformed_pdf_is_an_extraction_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.pdf");
        fs::write(&path, b"this is not a pdf").unwrap();

        let result = extract(&path);
        assert!(matches!(result, Err(PipelineError::Extraction { .. })));
    }

    #[test]
    fn test_blank_middle_page_keeps_real_page_numbers() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("manual.pdf");
        write_pdf(&path, &[Some("Hello page one"), None, Some("Third page")]);

        let segments = extract(&path).unwrap();

        let markers: Vec<Option<SegmentMarker>> =
            segments.iter().map(|s| s.marker).collect();
        assert_eq!(
            markers,
            vec![Some(SegmentMarker::Page(1)), Some(SegmentMarker::Page(3))]
        );
        assert_eq!(segments[0].text.trim(), "Hello page one");
        assert_eq!(segments[1].text.trim(), "Third page");
    }
}
