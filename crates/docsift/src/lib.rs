//! docsift - text and metadata extraction from documents
//!
//! docsift takes a file path, a byte buffer or a URI and returns the
//! document's plain text together with a flat metadata map. It works out the
//! content type (caller hint first, content sniffing as a fallback), hands the
//! stream to a pluggable parsing backend and can route images through an
//! external OCR executable.
//!
//! # Quick Start
//!
//! ```rust
//! use docsift::Extractor;
//!
//! # fn main() -> docsift::Result<()> {
//! let extractor = Extractor::new();
//! let result = extractor.extract_bytes_with_hints(br#"{"title": "Inventory", "items": 3}"#, "stock.json", "")?;
//!
//! assert_eq!(result.content_type(), "application/json");
//! assert_eq!(result.text(), "title: Inventory\nitems: 3");
//! assert_eq!(result.metadata_value("title"), Some("Inventory"));
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Sources** ([`StreamSource`]): file, byte-buffer and URI inputs with
//!   two-phase (prepare, open) stream acquisition
//! - **Backend** ([`plugins::ParsingBackend`]): [`AutoDetectBackend`] sniffs
//!   the content type and dispatches to a priority-ordered [`plugins::Decoder`]
//! - **Decoders** ([`extractors`]): plain text, Markdown, JSON/YAML/TOML, XML,
//!   HTML, PDF, ZIP archives and images
//! - **OCR** ([`ocr`]): an external, tesseract-compatible executable
//!
//! # Features
//!
//! - `tokio-runtime`: async wrappers on [`Extractor`]
//! - `remote`: `http`/`https` URIs
//! - `pdf`, `html`, `xml`, `archives`, `ocr`: format decoders

#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod extraction;
pub mod extractors;
pub mod ocr;
pub mod plugins;
pub mod types;

pub use error::{DocsiftError, Result};
pub use types::{ExtractionResult, Metadata, keys};

pub use core::backend::AutoDetectBackend;
pub use core::config::{ExtractorConfig, OcrConfig, RemoteConfig};
pub use core::extractor::Extractor;
pub use core::mime::{OCTET_STREAM_MIME_TYPE, detect_mime_type, detect_mime_type_from_bytes};
pub use core::source::{BytesSource, FileSource, StreamHandle, StreamSource, UriSource};

pub use url::Url;
