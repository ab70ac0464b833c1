//! XML text extraction.
//!
//! Streams the document with `quick-xml`, so memory use does not grow with
//! file size. Text runs are joined with single spaces; element names are
//! counted along the way. End-tag mismatches are tolerated.
//!
//! # Example
//!
//! ```rust
//! use docsift::extraction::xml::parse_xml;
//!
//! # fn example() -> docsift::Result<()> {
//! let xml = b"<root><item>Fish &amp; Chips</item><item>World</item></root>";
//! let result = parse_xml(&xml[..])?;
//!
//! assert_eq!(result.content, "Fish & Chips World");
//! assert_eq!(result.element_count, 3);
//! # Ok(())
//! # }
//! ```

use crate::{DocsiftError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesRef, Event};
use std::collections::BTreeSet;
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlParseResult {
    pub content: String,
    pub element_count: usize,
    /// Distinct element names, sorted.
    pub unique_elements: Vec<String>,
}

pub fn parse_xml<R: BufRead>(source: R) -> Result<XmlParseResult> {
    let mut reader = Reader::from_reader(source);
    reader.config_mut().trim_text(false);
    reader.config_mut().check_end_names = false;

    let mut content = String::new();
    let mut pending = String::new();
    let mut element_count = 0usize;
    let mut unique_elements = BTreeSet::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                flush_text(&mut pending, &mut content);
                element_count += 1;
                unique_elements.insert(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Ok(Event::End(_)) => flush_text(&mut pending, &mut content),
            Ok(Event::Text(e)) => pending.push_str(&String::from_utf8_lossy(e.as_ref())),
            Ok(Event::GeneralRef(e)) => {
                if let Some(resolved) = resolve_reference(&e) {
                    pending.push_str(&resolved);
                }
            }
            Ok(Event::CData(e)) => {
                flush_text(&mut pending, &mut content);
                pending.push_str(&String::from_utf8_lossy(&e));
                flush_text(&mut pending, &mut content);
            }
            Ok(Event::Eof) => {
                flush_text(&mut pending, &mut content);
                break;
            }
            Err(e) => {
                return Err(DocsiftError::parsing(format!(
                    "XML parsing error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(XmlParseResult {
        content,
        element_count,
        unique_elements: unique_elements.into_iter().collect(),
    })
}

fn flush_text(pending: &mut String, content: &mut String) {
    let trimmed = pending.trim();
    if !trimmed.is_empty() {
        if !content.is_empty() {
            content.push(' ');
        }
        content.push_str(trimmed);
    }
    pending.clear();
}

/// Character references and the five predefined entities. Unknown entities are dropped.
fn resolve_reference(reference: &BytesRef<'_>) -> Option<String> {
    if let Ok(Some(ch)) = reference.resolve_char_ref() {
        return Some(ch.to_string());
    }
    let name = reference.decode().ok()?;
    quick_xml::escape::resolve_predefined_entity(&name).map(str::to_string)
}
