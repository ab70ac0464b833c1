//! HTML decoder.
//!
//! Converts HTML to Markdown and records document metadata found in the head
//! (`title`, `description`, `keywords`, `author`, OpenGraph fields).

use crate::Result;
use crate::core::io::read_all;
use crate::core::mime::{HTML_MIME_TYPE, XHTML_MIME_TYPE};
use crate::extraction::html::process_html;
use crate::extractors::builtin_version;
use crate::plugins::{Decoder, ParseContext, Plugin, TextSink};
use crate::types::Metadata;
use std::io::Read;

pub struct HtmlDecoder;

impl HtmlDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for HtmlDecoder {
    fn name(&self) -> &str {
        "html-decoder"
    }

    fn version(&self) -> String {
        builtin_version()
    }

    fn description(&self) -> &str {
        "Converts HTML documents to Markdown text"
    }
}

impl Decoder for HtmlDecoder {
    fn supported_mime_types(&self) -> &[&str] {
        &[HTML_MIME_TYPE, XHTML_MIME_TYPE]
    }

    fn decode(
        &self,
        stream: &mut dyn Read,
        metadata: &mut Metadata,
        sink: &mut TextSink,
        _ctx: &ParseContext,
    ) -> Result<()> {
        let bytes = read_all(stream)?;
        let html = String::from_utf8_lossy(&bytes);
        let result = process_html(&html)?;

        for (name, value) in result.metadata {
            metadata.set(name, value);
        }

        sink.push(result.markdown.trim_end());
        Ok(())
    }
}
