//! Built-in decoders.
//!
//! All decoders implement the [`Decoder`](crate::plugins::Decoder) plugin
//! trait and are registered into each backend's own registry by
//! [`register_default_decoders`].

use crate::Result;
use crate::plugins::DecoderRegistry;
use std::sync::Arc;

pub mod structured;
pub mod text;

#[cfg(feature = "ocr")]
pub mod image;

#[cfg(feature = "archives")]
pub mod archive;

#[cfg(feature = "html")]
pub mod html;

#[cfg(feature = "pdf")]
pub mod pdf;

#[cfg(feature = "xml")]
pub mod xml;

pub use structured::StructuredDecoder;
pub use text::{MarkdownDecoder, PlainTextDecoder};

#[cfg(feature = "ocr")]
pub use image::ImageDecoder;

#[cfg(feature = "archives")]
pub use archive::ZipDecoder;

#[cfg(feature = "html")]
pub use html::HtmlDecoder;

#[cfg(feature = "pdf")]
pub use pdf::PdfDecoder;

#[cfg(feature = "xml")]
pub use xml::XmlDecoder;

/// Version reported by every built-in decoder.
pub(crate) fn builtin_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Register every built-in decoder enabled by crate features.
pub fn register_default_decoders(registry: &mut DecoderRegistry) -> Result<()> {
    registry.register(Arc::new(PlainTextDecoder::new()))?;
    registry.register(Arc::new(MarkdownDecoder::new()))?;
    registry.register(Arc::new(StructuredDecoder::new()))?;

    #[cfg(feature = "ocr")]
    registry.register(Arc::new(ImageDecoder::new()))?;

    #[cfg(feature = "xml")]
    registry.register(Arc::new(XmlDecoder::new()))?;

    #[cfg(feature = "html")]
    registry.register(Arc::new(HtmlDecoder::new()))?;

    #[cfg(feature = "pdf")]
    registry.register(Arc::new(PdfDecoder::new()))?;

    #[cfg(feature = "archives")]
    registry.register(Arc::new(ZipDecoder::new()))?;

    Ok(())
}
