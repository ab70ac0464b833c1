//! Structured data decoder for JSON, YAML and TOML.

use crate::core::io::read_all;
use crate::core::mime::{JSON_MIME_TYPE, TOML_MIME_TYPE, YAML_MIME_TYPE, base_mime_type};
use crate::extraction::structured::{parse_json, parse_toml, parse_yaml};
use crate::extractors::builtin_version;
use crate::plugins::{Decoder, ParseContext, Plugin, TextSink};
use crate::types::{Metadata, keys};
use crate::{DocsiftError, Result};
use std::io::Read;

/// Flattens structured documents into `path: value` lines.
pub struct StructuredDecoder;

impl StructuredDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StructuredDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for StructuredDecoder {
    fn name(&self) -> &str {
        "structured-decoder"
    }

    fn version(&self) -> String {
        builtin_version()
    }

    fn description(&self) -> &str {
        "Decodes JSON, YAML and TOML documents"
    }
}

impl Decoder for StructuredDecoder {
    fn supported_mime_types(&self) -> &[&str] {
        &[
            JSON_MIME_TYPE,
            "text/json",
            YAML_MIME_TYPE,
            "application/yaml",
            "text/yaml",
            "text/x-yaml",
            TOML_MIME_TYPE,
            "text/toml",
        ]
    }

    fn decode(
        &self,
        stream: &mut dyn Read,
        metadata: &mut Metadata,
        sink: &mut TextSink,
        _ctx: &ParseContext,
    ) -> Result<()> {
        let content_type = base_mime_type(metadata.get(keys::CONTENT_TYPE).unwrap_or_default());
        let bytes = read_all(stream)?;

        let result = match content_type.as_str() {
            JSON_MIME_TYPE | "text/json" => parse_json(&bytes)?,
            YAML_MIME_TYPE | "application/yaml" | "text/yaml" | "text/x-yaml" => parse_yaml(&bytes)?,
            TOML_MIME_TYPE | "text/toml" => parse_toml(&bytes)?,
            other => return Err(DocsiftError::UnsupportedFormat(format!("Unsupported structured format: {}", other))),
        };

        metadata.set("data_format", result.format);
        metadata.set("field_count", result.field_count.to_string());
        for (name, value) in result.text_fields {
            metadata.set(name, value);
        }

        sink.push(&result.content);
        Ok(())
    }
}
