//! Core extraction orchestration.
//!
//! - [`extractor`]: the public [`Extractor`](extractor::Extractor) entry point
//! - [`source`]: file, byte-buffer and URI stream sources
//! - [`resolver`]: content-type resolution for byte inputs
//! - [`backend`]: the default content-sniffing parsing backend
//! - [`assembler`]: turns parser output into an [`ExtractionResult`](crate::ExtractionResult)
//! - [`ocr`]: instance-scoped OCR settings
//! - [`config`], [`mime`], [`io`]: configuration, MIME tables and I/O helpers

pub mod assembler;
pub mod backend;
pub mod config;
pub mod extractor;
pub mod io;
pub mod mime;
pub mod ocr;
pub mod resolver;
pub mod source;

pub use backend::AutoDetectBackend;
pub use config::{ExtractorConfig, OcrConfig, RemoteConfig};
pub use extractor::Extractor;
pub use source::{BytesSource, FileSource, StreamHandle, StreamSource, UriSource};
