//! Plain text and Markdown decoders.

use crate::Result;
use crate::core::io::read_all;
use crate::extraction::text::{TextParseResult, parse_text};
use crate::extractors::builtin_version;
use crate::plugins::{Decoder, ParseContext, Plugin, TextSink};
use crate::types::Metadata;
use std::io::Read;

fn record_counts(result: &TextParseResult, metadata: &mut Metadata) {
    metadata.set("line_count", result.line_count.to_string());
    metadata.set("word_count", result.word_count.to_string());
    metadata.set("character_count", result.character_count.to_string());
}

/// Plain text decoder.
///
/// Decodes UTF-8 (lossily) and emits the content verbatim, minus trailing newlines.
pub struct PlainTextDecoder;

impl PlainTextDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for PlainTextDecoder {
    fn name(&self) -> &str {
        "plain-text-decoder"
    }

    fn version(&self) -> String {
        builtin_version()
    }

    fn description(&self) -> &str {
        "Decodes plain text, CSV and TSV files"
    }
}

impl Decoder for PlainTextDecoder {
    fn supported_mime_types(&self) -> &[&str] {
        &["text/plain", "text/csv", "text/tab-separated-values"]
    }

    fn decode(
        &self,
        stream: &mut dyn Read,
        metadata: &mut Metadata,
        sink: &mut TextSink,
        _ctx: &ParseContext,
    ) -> Result<()> {
        let bytes = read_all(stream)?;
        let result = parse_text(&bytes, false);
        record_counts(&result, metadata);
        sink.push(&result.content);
        Ok(())
    }
}

/// Markdown decoder.
///
/// Emits the Markdown source as-is and records the first heading as `title`.
pub struct MarkdownDecoder;

impl MarkdownDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MarkdownDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for MarkdownDecoder {
    fn name(&self) -> &str {
        "markdown-decoder"
    }

    fn version(&self) -> String {
        builtin_version()
    }

    fn description(&self) -> &str {
        "Decodes Markdown files and picks up the document title"
    }
}

impl Decoder for MarkdownDecoder {
    fn supported_mime_types(&self) -> &[&str] {
        &["text/markdown", "text/x-markdown"]
    }

    fn decode(
        &self,
        stream: &mut dyn Read,
        metadata: &mut Metadata,
        sink: &mut TextSink,
        _ctx: &ParseContext,
    ) -> Result<()> {
        let bytes = read_all(stream)?;
        let result = parse_text(&bytes, true);
        record_counts(&result, metadata);
        if let Some(title) = &result.title {
            metadata.set("title", title.as_str());
        }
        sink.push(&result.content);
        Ok(())
    }
}
