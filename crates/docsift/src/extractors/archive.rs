//! ZIP archive decoder.
//!
//! Every regular entry is parsed as an embedded document through the same
//! backend, so archives of PDFs, Markdown or nested archives all contribute
//! text. Entries that fail to decode are logged and skipped.

use crate::core::io::read_all;
use crate::core::mime::ZIP_MIME_TYPE;
use crate::extractors::builtin_version;
use crate::plugins::{Decoder, ParseContext, Plugin, TextSink};
use crate::types::{Metadata, keys};
use crate::{DocsiftError, Result};
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Entries larger than this (uncompressed) are listed but not parsed.
const MAX_ENTRY_BYTES: u64 = 64 * 1024 * 1024;

pub struct ZipDecoder;

impl ZipDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ZipDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for ZipDecoder {
    fn name(&self) -> &str {
        "zip-decoder"
    }

    fn version(&self) -> String {
        builtin_version()
    }

    fn description(&self) -> &str {
        "Extracts text from every document inside a ZIP archive"
    }
}

impl Decoder for ZipDecoder {
    fn supported_mime_types(&self) -> &[&str] {
        &[ZIP_MIME_TYPE, "application/x-zip-compressed"]
    }

    fn decode(
        &self,
        stream: &mut dyn Read,
        metadata: &mut Metadata,
        sink: &mut TextSink,
        ctx: &ParseContext,
    ) -> Result<()> {
        let bytes = read_all(stream)?;
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| DocsiftError::parsing_with_source("Failed to read ZIP archive", e))?;

        metadata.set("archive:format", "zip");
        metadata.set("archive:file_count", archive.len().to_string());

        let descend = match ctx.nested() {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Not descending into archive entries: {}", e);
                false
            }
        };

        for index in 0..archive.len() {
            let mut entry = match archive.by_index(index) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable archive entry #{}: {}", index, e);
                    continue;
                }
            };

            if entry.is_dir() {
                continue;
            }

            let path = entry.name().to_string();
            metadata.add("archive:entry", path.as_str());

            if !descend {
                continue;
            }
            if entry.size() > MAX_ENTRY_BYTES {
                tracing::warn!("Skipping archive entry '{}': {} bytes exceeds limit", path, entry.size());
                continue;
            }

            let mut data = Vec::with_capacity(entry.size() as usize);
            if let Err(e) = entry.read_to_end(&mut data) {
                tracing::warn!("Skipping archive entry '{}': {}", path, e);
                continue;
            }

            let mut entry_metadata = Metadata::new();
            let name = path.rsplit('/').next().unwrap_or(path.as_str());
            entry_metadata.set(keys::RESOURCE_NAME, name);

            let mut entry_sink = TextSink::new();
            match ctx.parse_embedded(&mut Cursor::new(data), &mut entry_metadata, &mut entry_sink) {
                Ok(()) => sink.push_block(entry_sink.as_str()),
                Err(e) => tracing::warn!("Skipping archive entry '{}': {}", path, e),
            }
        }

        Ok(())
    }
}
