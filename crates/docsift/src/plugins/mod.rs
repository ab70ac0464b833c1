//! Plugin system for extending docsift.
//!
//! # Plugin Types
//!
//! - [`Plugin`] - base trait with identity and lifecycle hooks
//! - [`Decoder`] - turns one family of content types into text and metadata
//! - [`Detector`] / [`ParsingBackend`] - the capability the orchestrator calls
//!   into; [`AutoDetectBackend`](crate::AutoDetectBackend) is the default
//!
//! # Example: Custom Decoder
//!
//! ```rust
//! use docsift::plugins::{Decoder, ParseContext, Plugin, TextSink};
//! use docsift::{AutoDetectBackend, Extractor, ExtractorConfig, Metadata, Result};
//! use std::io::Read;
//! use std::sync::Arc;
//!
//! struct ReverseDecoder;
//!
//! impl Plugin for ReverseDecoder {
//!     fn name(&self) -> &str { "reverse-decoder" }
//!     fn version(&self) -> String { "1.0.0".to_string() }
//! }
//!
//! impl Decoder for ReverseDecoder {
//!     fn supported_mime_types(&self) -> &[&str] { &["text/x-reversed"] }
//!
//!     fn decode(
//!         &self,
//!         stream: &mut dyn Read,
//!         _metadata: &mut Metadata,
//!         sink: &mut TextSink,
//!         _ctx: &ParseContext,
//!     ) -> Result<()> {
//!         let mut text = String::new();
//!         stream.read_to_string(&mut text)?;
//!         sink.push(&text.chars().rev().collect::<String>());
//!         Ok(())
//!     }
//! }
//!
//! let config = ExtractorConfig::default();
//! let backend = AutoDetectBackend::with_config(&config);
//! backend.register(Arc::new(ReverseDecoder))?;
//!
//! let extractor = Extractor::with_backend(Arc::new(backend), config);
//! let result = extractor.extract_bytes_with_hints(b"olleh", "", "text/x-reversed")?;
//! assert_eq!(result.text(), "hello");
//! # Ok::<(), docsift::DocsiftError>(())
//! ```

pub mod backend;
pub mod decoder;
pub mod registry;
pub mod traits;

pub use backend::{Detector, ParseContext, ParsingBackend, TextSink};
pub use decoder::Decoder;
pub use registry::DecoderRegistry;
pub use traits::Plugin;
