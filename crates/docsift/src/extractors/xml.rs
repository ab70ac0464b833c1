//! XML decoder.

use crate::Result;
use crate::core::mime::{SVG_MIME_TYPE, XML_MIME_TYPE, XML_TEXT_MIME_TYPE};
use crate::extraction::xml::parse_xml;
use crate::extractors::builtin_version;
use crate::plugins::{Decoder, ParseContext, Plugin, TextSink};
use crate::types::Metadata;
use std::io::{BufReader, Read};

/// Streams XML (and SVG) documents, emitting their character data.
pub struct XmlDecoder;

impl XmlDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for XmlDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for XmlDecoder {
    fn name(&self) -> &str {
        "xml-decoder"
    }

    fn version(&self) -> String {
        builtin_version()
    }

    fn description(&self) -> &str {
        "Extracts character data from XML documents"
    }
}

impl Decoder for XmlDecoder {
    fn supported_mime_types(&self) -> &[&str] {
        &[XML_MIME_TYPE, XML_TEXT_MIME_TYPE, SVG_MIME_TYPE]
    }

    fn decode(
        &self,
        stream: &mut dyn Read,
        metadata: &mut Metadata,
        sink: &mut TextSink,
        _ctx: &ParseContext,
    ) -> Result<()> {
        let result = parse_xml(BufReader::new(stream))?;

        metadata.set("element_count", result.element_count.to_string());
        metadata.set("unique_elements", result.unique_elements.len().to_string());

        sink.push(&result.content);
        Ok(())
    }
}
