//! Format-level parsing functions used by the built-in decoders.
//!
//! Each function here works on bytes or a buffered reader and knows nothing
//! about metadata carriers or plugin wiring.

pub mod structured;
pub mod text;

#[cfg(feature = "ocr")]
pub mod image;

#[cfg(feature = "html")]
pub mod html;

#[cfg(feature = "xml")]
pub mod xml;

pub use structured::{StructuredDataResult, parse_json, parse_toml, parse_yaml};
pub use text::{TextParseResult, parse_text};

#[cfg(feature = "ocr")]
pub use image::{ImageMetadata, extract_image_metadata};

#[cfg(feature = "html")]
pub use html::{HtmlParseResult, convert_html_to_markdown, process_html};

#[cfg(feature = "xml")]
pub use xml::{XmlParseResult, parse_xml};
