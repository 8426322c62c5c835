// file: src/extractor/pptx.rs
// description: slide text extraction from presentationml packages
// reference: https://docs.rs/quick-xml, https://docs.rs/zip

use crate::error::{PipelineError, Result};
use crate::models::TextSegment;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PART: &str = "ppt/_rels/presentation.xml.rels";

/// Soft line break within a paragraph.
const LINE_BREAK: char = '\u{000B}';

/// One segment per slide that has text, in presentation order. Slide text is
/// the text of every top-level shape, one shape per line.
pub fn extract(path: &Path) -> Result<Vec<TextSegment>> {
    let file = File::open(path).map_err(|e| PipelineError::extraction(path, e))?;
    let mut archive = ZipArchive::new(file).map_err(|e| PipelineError::extraction(path, e))?;

    let slide_parts = slide_order(&mut archive).map_err(|e| PipelineError::extraction(path, e))?;

    let mut segments = Vec::new();
    for (position, part) in slide_parts.iter().enumerate() {
        let xml = read_part(&mut archive, part).map_err(|e| PipelineError::extraction(path, e))?;
        let shapes = shape_texts(&xml).map_err(|e| PipelineError::extraction(path, e))?;
        if !shapes.is_empty() {
            segments.push(TextSegment::slide(position + 1, shapes.join("\n")));
        }
    }

    debug!(
        "Parsed PPTX: {} ({} of {} slides with text)",
        path.display(),
        segments.len(),
        slide_parts.len()
    );
    Ok(segments)
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> std::result::Result<String, String> {
    let mut entry = archive
        .by_name(name)
        .map_err(|e| format!("missing part {}: {}", name, e))?;
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| format!("unreadable part {}: {}", name, e))?;
    Ok(xml)
}

/// Resolves `sldIdLst` through the presentation relationships into part names.
fn slide_order<R: Read + Seek>(archive: &mut ZipArchive<R>) -> std::result::Result<Vec<String>, String> {
    let presentation = read_part(archive, PRESENTATION_PART)?;
    let rels = read_part(archive, PRESENTATION_RELS_PART)?;

    let targets = relationship_targets(&rels).map_err(|e| e.to_string())?;
    let ids = slide_relationship_ids(&presentation).map_err(|e| e.to_string())?;

    ids.into_iter()
        .map(|id| {
            targets
                .get(&id)
                .map(|target| resolve_target(target))
                .ok_or_else(|| format!("slide relationship {} has no target", id))
        })
        .collect()
}

fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("ppt/{}", target),
    }
}

fn attribute(element: &BytesStart<'_>, name: &[u8]) -> quick_xml::Result<Option<String>> {
    match element.try_get_attribute(name)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

fn relationship_targets(xml: &str) -> quick_xml::Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut targets = HashMap::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (attribute(&e, b"Id")?, attribute(&e, b"Target")?) {
                    targets.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(targets)
}

fn slide_relationship_ids(xml: &str) -> quick_xml::Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut ids = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldId" => {
                if let Some(id) = attribute(&e, b"r:id")? {
                    ids.push(id);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(ids)
}

/// Text of each top-level `p:sp` shape with non-empty text. Paragraphs inside a
/// shape are joined with `\n`, empty ones included, and an `a:br` soft break
/// inside a paragraph becomes a vertical tab. Grouped shapes and graphic frames
/// are ignored.
fn shape_texts(xml: &str) -> quick_xml::Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Vec<u8>> = Vec::new();

    let mut shapes = Vec::new();
    let mut shape_depth: Option<usize> = None;
    let mut paragraphs: Vec<String> = Vec::new();
    let mut paragraph = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                match name.as_slice() {
                    b"sp" if shape_depth.is_none()
                        && stack.last().map(Vec::as_slice) == Some(b"spTree".as_slice()) =>
                    {
                        shape_depth = Some(stack.len());
                        paragraphs.clear();
                    }
                    b"p" if shape_depth.is_some() => paragraph.clear(),
                    b"br" if shape_depth.is_some() => paragraph.push(LINE_BREAK),
                    b"t" if shape_depth.is_some() => in_text_run = true,
                    _ => {}
                }
                stack.push(name);
            }
            Event::Empty(e) if shape_depth.is_some() => match e.local_name().as_ref() {
                b"br" => paragraph.push(LINE_BREAK),
                b"p" => paragraphs.push(String::new()),
                _ => {}
            },
            Event::Text(t) if in_text_run => {
                paragraph.push_str(&t.unescape()?);
            }
            Event::End(_) => {
                let Some(name) = stack.pop() else {
                    continue;
                };
                match name.as_slice() {
                    b"t" => in_text_run = false,
                    b"p" if shape_depth.is_some() => paragraphs.push(std::mem::take(&mut paragraph)),
                    b"sp" if shape_depth == Some(stack.len()) => {
                        let text = paragraphs.join("\n");
                        if !text.is_empty() {
                            shapes.push(text);
                        }
                        paragraphs.clear();
                        shape_depth = None;
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(shapes)
}
