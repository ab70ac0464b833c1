//! Image decoder.
//!
//! Images carry no text of their own. Dimensions, format and common EXIF tags
//! are recorded as metadata; when the call has OCR enabled the image is sent
//! to the OCR backend and its output becomes the document text.

use crate::Result;
use crate::core::io::read_all;
use crate::extraction::image::extract_image_metadata;
use crate::extractors::builtin_version;
use crate::ocr::run_ocr;
use crate::plugins::{Decoder, ParseContext, Plugin, TextSink};
use crate::types::Metadata;
use std::io::Read;

pub struct ImageDecoder;

impl ImageDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for ImageDecoder {
    fn name(&self) -> &str {
        "image-decoder"
    }

    fn version(&self) -> String {
        builtin_version()
    }

    fn description(&self) -> &str {
        "Reads image metadata and runs OCR when enabled"
    }
}

impl Decoder for ImageDecoder {
    fn supported_mime_types(&self) -> &[&str] {
        &["image/*"]
    }

    fn decode(
        &self,
        stream: &mut dyn Read,
        metadata: &mut Metadata,
        sink: &mut TextSink,
        ctx: &ParseContext,
    ) -> Result<()> {
        let bytes = read_all(stream)?;

        match extract_image_metadata(&bytes) {
            Ok(image) => {
                metadata.set("image:width", image.width.to_string());
                metadata.set("image:height", image.height.to_string());
                metadata.set("image:format", image.format);
                for (tag, value) in image.exif_data {
                    metadata.set(format!("exif:{}", tag), value);
                }
            }
            Err(e) => tracing::warn!("Failed to read image metadata: {}", e),
        }

        if let Some(ocr) = &ctx.ocr {
            let text = run_ocr(&bytes, ocr)?;
            metadata.set("ocr:backend", ocr.backend_path.display().to_string());
            metadata.set("ocr:language", ocr.language.as_str());
            sink.push(&text);
        }

        Ok(())
    }
}
