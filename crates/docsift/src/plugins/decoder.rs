//! Decoder plugin trait.
//!
//! A decoder turns one family of content types into text and metadata. The
//! default backend picks a decoder for the document's `Content-Type` through
//! a [`DecoderRegistry`](crate::plugins::DecoderRegistry).

use crate::Result;
use crate::plugins::{ParseContext, Plugin, TextSink};
use crate::types::Metadata;
use std::io::Read;

/// Trait for format decoders.
///
/// # Priority
///
/// When several decoders claim the same content type the highest priority wins.
/// Built-in decoders use 50; register a custom decoder with a higher value to
/// override one.
///
/// # Example
///
/// ```rust
/// use docsift::plugins::{Decoder, ParseContext, Plugin, TextSink};
/// use docsift::{Metadata, Result};
/// use std::io::Read;
///
/// struct ShoutDecoder;
///
/// impl Plugin for ShoutDecoder {
///     fn name(&self) -> &str { "shout-decoder" }
///     fn version(&self) -> String { "1.0.0".to_string() }
/// }
///
/// impl Decoder for ShoutDecoder {
///     fn supported_mime_types(&self) -> &[&str] {
///         &["text/x-shout"]
///     }
///
///     fn decode(
///         &self,
///         stream: &mut dyn Read,
///         _metadata: &mut Metadata,
///         sink: &mut TextSink,
///         _ctx: &ParseContext,
///     ) -> Result<()> {
///         let mut text = String::new();
///         stream.read_to_string(&mut text)?;
///         sink.push(&text.to_uppercase());
///         Ok(())
///     }
/// }
/// ```
pub trait Decoder: Plugin {
    /// Content types handled by this decoder.
    ///
    /// Entries are exact (`"application/pdf"`) or prefix patterns (`"image/*"`).
    fn supported_mime_types(&self) -> &[&str];

    fn priority(&self) -> i32 {
        50
    }

    /// Decode `stream`, emitting text into `sink` and attributes into `metadata`.
    ///
    /// `Content-Type` is already set when this is called.
    fn decode(&self, stream: &mut dyn Read, metadata: &mut Metadata, sink: &mut TextSink, ctx: &ParseContext)
    -> Result<()>;
}
