//! PDF decoder.
//!
//! Text comes from `lopdf`'s content-stream text extraction, one block per
//! page. Pages that fail to decode are skipped with a warning. Document Info
//! entries (`Title`, `Author`, ...) are recorded as metadata.

use crate::core::io::read_all;
use crate::core::mime::PDF_MIME_TYPE;
use crate::extractors::builtin_version;
use crate::plugins::{Decoder, ParseContext, Plugin, TextSink};
use crate::types::Metadata;
use crate::{DocsiftError, Result};
use lopdf::{Dictionary, Document, Object};
use std::io::Read;

const INFO_FIELDS: &[(&[u8], &str)] = &[
    (b"Title", "title"),
    (b"Author", "author"),
    (b"Subject", "subject"),
    (b"Keywords", "keywords"),
    (b"Creator", "creator"),
    (b"Producer", "producer"),
    (b"CreationDate", "created"),
    (b"ModDate", "modified"),
];

pub struct PdfDecoder;

impl PdfDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for PdfDecoder {
    fn name(&self) -> &str {
        "pdf-decoder"
    }

    fn version(&self) -> String {
        builtin_version()
    }

    fn description(&self) -> &str {
        "Extracts text and document information from PDF files"
    }
}

impl Decoder for PdfDecoder {
    fn supported_mime_types(&self) -> &[&str] {
        &[PDF_MIME_TYPE]
    }

    fn decode(
        &self,
        stream: &mut dyn Read,
        metadata: &mut Metadata,
        sink: &mut TextSink,
        _ctx: &ParseContext,
    ) -> Result<()> {
        let bytes = read_all(stream)?;
        let document =
            Document::load_mem(&bytes).map_err(|e| DocsiftError::parsing_with_source("Failed to load PDF", e))?;

        let pages = document.get_pages();
        metadata.set("page_count", pages.len().to_string());
        metadata.set("pdf:version", document.version.as_str());

        if let Some(info) = info_dictionary(&document) {
            for (key, name) in INFO_FIELDS {
                if let Ok(Object::String(raw, _)) = info.get(key) {
                    let value = decode_pdf_string(raw);
                    let value = value.trim();
                    if !value.is_empty() {
                        metadata.set(*name, value);
                    }
                }
            }
        }

        for page_number in pages.keys() {
            match document.extract_text(&[*page_number]) {
                Ok(text) => sink.push_block(&text),
                Err(e) => tracing::warn!("Skipping PDF page {}: {}", page_number, e),
            }
        }

        Ok(())
    }
}

fn info_dictionary(document: &Document) -> Option<&Dictionary> {
    match document.trailer.get(b"Info").ok()? {
        Object::Reference(id) => document.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// PDF text strings are UTF-16BE when they start with a byte-order mark and
/// PDFDocEncoding (close enough to Latin-1) otherwise.
fn decode_pdf_string(raw: &[u8]) -> String {
    if let Some(utf16) = raw.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    if let Ok(text) = std::str::from_utf8(raw) {
        return text.to_string();
    }
    raw.iter().map(|&b| b as char).collect()
}
