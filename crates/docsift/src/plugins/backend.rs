//! Parsing backend contract.
//!
//! The orchestrator never decodes bytes itself. It hands a stream and the
//! per-call [`Metadata`] to a [`ParsingBackend`], which reports text through a
//! [`TextSink`] and enriches the metadata with format-specific attributes.

use crate::core::config::{ExtractorConfig, OcrConfig};
use crate::types::Metadata;
use crate::{DocsiftError, Result};
use std::fmt;
use std::io::Read;
use std::sync::Arc;

/// Content-type sniffing capability.
pub trait Detector: Send + Sync {
    /// Inspect the head of `stream` (and name hints in `metadata`) and report a
    /// MIME type.
    ///
    /// Returns `application/octet-stream` when the type cannot be determined.
    /// The stream may be partially consumed.
    fn detect(&self, stream: &mut dyn Read, metadata: &Metadata) -> Result<String>;
}

/// Format-agnostic document parser.
///
/// # Contract
///
/// When `parse` returns `Ok`, `metadata` must hold a `Content-Type` value (the
/// detected type or a default). Returning without one is a defect reported as
/// [`DocsiftError::InvariantViolation`] by the result assembler.
pub trait ParsingBackend: Detector {
    fn parse(
        &self,
        stream: &mut dyn Read,
        metadata: &mut Metadata,
        sink: &mut TextSink,
        ctx: &ParseContext,
    ) -> Result<()>;
}

/// Per-call state handed to the backend and every decoder it invokes.
#[derive(Clone)]
pub struct ParseContext {
    /// Snapshot of the OCR configuration taken when the call started.
    pub ocr: Option<OcrConfig>,
    /// Backend used for embedded documents.
    pub backend: Arc<dyn ParsingBackend>,
    pub config: Arc<ExtractorConfig>,
    /// Embedding depth; 0 for the top-level document.
    pub depth: usize,
}

impl ParseContext {
    pub fn new(backend: Arc<dyn ParsingBackend>, config: Arc<ExtractorConfig>, ocr: Option<OcrConfig>) -> Self {
        Self {
            ocr,
            backend,
            config,
            depth: 0,
        }
    }

    /// Context for a document embedded in the current one.
    ///
    /// # Errors
    ///
    /// Returns `DocsiftError::Validation` once `max_embedded_depth` is exceeded.
    pub fn nested(&self) -> Result<Self> {
        let depth = self.depth + 1;
        if depth > self.config.max_embedded_depth {
            return Err(DocsiftError::validation(format!(
                "Embedded document depth {} exceeds limit of {}",
                depth, self.config.max_embedded_depth
            )));
        }

        Ok(Self {
            depth,
            ..self.clone()
        })
    }

    /// Parse an embedded document with the same backend, one level deeper.
    pub fn parse_embedded(&self, stream: &mut dyn Read, metadata: &mut Metadata, sink: &mut TextSink) -> Result<()> {
        let nested = self.nested()?;
        self.backend.parse(stream, metadata, sink, &nested)
    }
}

impl fmt::Debug for ParseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseContext")
            .field("ocr", &self.ocr)
            .field("depth", &self.depth)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Receives the text events emitted while a document is parsed.
#[derive(Debug, Default, Clone)]
pub struct TextSink {
    buffer: String,
}

impl TextSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text exactly as given.
    pub fn push(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Append a block of text, separated from earlier content by a blank line.
    ///
    /// Blank blocks are ignored.
    pub fn push_block(&mut self, text: &str) {
        let text = text.trim_end();
        if text.trim().is_empty() {
            return;
        }
        if !self.buffer.is_empty() {
            if !self.buffer.ends_with('\n') {
                self.buffer.push('\n');
            }
            if !self.buffer.ends_with("\n\n") {
                self.buffer.push('\n');
            }
        }
        self.buffer.push_str(text);
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn into_text(self) -> String {
        self.buffer
    }
}
