//! Default parsing backend.
//!
//! [`AutoDetectBackend`] sniffs the content type when metadata does not carry
//! one, then dispatches to the highest-priority [`Decoder`] registered for it.

use crate::core::config::ExtractorConfig;
use crate::core::io::{read_prefix, rechain};
use crate::core::mime::{OCTET_STREAM_MIME_TYPE, base_mime_type, detect_mime_type_from_bytes, is_generic};
use crate::extractors::register_default_decoders;
use crate::plugins::{Decoder, DecoderRegistry, Detector, ParseContext, ParsingBackend, TextSink};
use crate::types::{Metadata, keys};
use crate::{DocsiftError, Result};
use parking_lot::RwLock;
use std::io::Read;
use std::sync::Arc;

/// Content-sniffing backend backed by a per-instance decoder registry.
pub struct AutoDetectBackend {
    registry: RwLock<DecoderRegistry>,
    peek_bytes: usize,
}

impl AutoDetectBackend {
    /// Backend with all built-in decoders and default settings.
    pub fn new() -> Self {
        Self::with_config(&ExtractorConfig::default())
    }

    /// Backend with the built-in decoders enabled by crate features.
    ///
    /// Built-ins are registered in a fixed order. Should one of them fail to
    /// initialize, the failure is logged at `warn` and the backend is returned
    /// without that decoder and any registered after it; use [`Self::decoders`]
    /// to inspect what is available.
    pub fn with_config(config: &ExtractorConfig) -> Self {
        let backend = Self::empty(config);
        {
            let mut registry = backend.registry.write();
            if let Err(e) = register_default_decoders(&mut registry) {
                tracing::warn!(error = %e, registered = ?registry.list(), "Failed to register default decoders");
            }
        }
        backend
    }

    /// Backend without any decoders; every document yields empty text unless
    /// decoders are registered.
    pub fn empty(config: &ExtractorConfig) -> Self {
        Self {
            registry: RwLock::new(DecoderRegistry::new()),
            peek_bytes: config.detection_peek_bytes.max(1),
        }
    }

    /// Register an additional decoder.
    pub fn register(&self, decoder: Arc<dyn Decoder>) -> Result<()> {
        self.registry.write().register(decoder)
    }

    /// Remove a decoder by name.
    pub fn unregister(&self, name: &str) -> Result<()> {
        self.registry.write().remove(name)
    }

    /// Names of the registered decoders, sorted.
    pub fn decoders(&self) -> Vec<String> {
        self.registry.read().list()
    }

    fn detect_prefix(&self, prefix: &[u8], metadata: &Metadata) -> String {
        detect_mime_type_from_bytes(prefix, metadata.get(keys::RESOURCE_NAME))
    }
}

impl Default for AutoDetectBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for AutoDetectBackend {
    fn detect(&self, stream: &mut dyn Read, metadata: &Metadata) -> Result<String> {
        let prefix = read_prefix(stream, self.peek_bytes)?;
        Ok(self.detect_prefix(&prefix, metadata))
    }
}

impl ParsingBackend for AutoDetectBackend {
    fn parse(
        &self,
        stream: &mut dyn Read,
        metadata: &mut Metadata,
        sink: &mut TextSink,
        ctx: &ParseContext,
    ) -> Result<()> {
        let needs_detection = metadata.get(keys::CONTENT_TYPE).is_none_or(is_generic);

        let mut rechained;
        let stream: &mut dyn Read = if needs_detection {
            let prefix = read_prefix(stream, self.peek_bytes)?;
            let detected = self.detect_prefix(&prefix, metadata);
            tracing::debug!(content_type = %detected, depth = ctx.depth, "Detected content type");
            metadata.set(keys::CONTENT_TYPE, detected);
            rechained = rechain(prefix, stream);
            &mut rechained
        } else {
            stream
        };

        let content_type = metadata
            .get(keys::CONTENT_TYPE)
            .unwrap_or(OCTET_STREAM_MIME_TYPE)
            .to_string();
        let base_type = base_mime_type(&content_type);

        // Guard is released before decoding so embedded documents can re-enter.
        let decoder = self.registry.read().find(&base_type);

        match decoder {
            Some(decoder) => {
                tracing::debug!(decoder = decoder.name(), content_type = %base_type, "Selected decoder");
                metadata.add(keys::PARSED_BY, decoder.name());
                decoder.decode(stream, metadata, sink, ctx)
            }
            None if ctx.config.strict_formats => Err(DocsiftError::UnsupportedFormat(content_type)),
            None => {
                tracing::debug!(content_type = %base_type, "No decoder registered; returning empty document");
                Ok(())
            }
        }
    }
}
