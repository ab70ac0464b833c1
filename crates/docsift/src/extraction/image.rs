//! Image metadata extraction.
//!
//! Reads dimensions and format from the image header without decoding pixel
//! data, plus a handful of common EXIF tags when present.

use crate::{DocsiftError, Result};
use exif::{In, Reader, Tag};
use image::ImageReader;
use indexmap::IndexMap;
use std::io::Cursor;

#[derive(Debug, Clone)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    /// Upper-case format name, e.g. `PNG`.
    pub format: String,
    pub exif_data: IndexMap<String, String>,
}

pub fn extract_image_metadata(bytes: &[u8]) -> Result<ImageMetadata> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DocsiftError::parsing(format!("Failed to read image format: {}", e)))?;

    let format = reader
        .format()
        .ok_or_else(|| DocsiftError::parsing("Could not determine image format".to_string()))?;

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| DocsiftError::parsing(format!("Failed to read image dimensions: {}", e)))?;

    Ok(ImageMetadata {
        width,
        height,
        format: format!("{:?}", format).to_uppercase(),
        exif_data: extract_exif_data(bytes),
    })
}

fn extract_exif_data(bytes: &[u8]) -> IndexMap<String, String> {
    let mut exif_map = IndexMap::new();

    let exif_reader = match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(reader) => reader,
        Err(_) => return exif_map,
    };

    let common_tags = [
        (Tag::Make, "Make"),
        (Tag::Model, "Model"),
        (Tag::DateTime, "DateTime"),
        (Tag::DateTimeOriginal, "DateTimeOriginal"),
        (Tag::Software, "Software"),
        (Tag::Orientation, "Orientation"),
        (Tag::ImageDescription, "ImageDescription"),
        (Tag::Artist, "Artist"),
        (Tag::Copyright, "Copyright"),
    ];

    for (tag, field_name) in common_tags {
        if let Some(field) = exif_reader.get_field(tag, In::PRIMARY) {
            exif_map.insert(field_name.to_string(), field.display_value().to_string());
        }
    }

    exif_map
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgb};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(width, height, Rgb([200, 10, 10]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        bytes
    }

    #[test]
    fn test_png_dimensions() {
        let metadata = extract_image_metadata(&png_bytes(12, 7)).unwrap();
        assert_eq!(metadata.width, 12);
        assert_eq!(metadata.height, 7);
        assert_eq!(metadata.format, "PNG");
        assert!(metadata.exif_data.is_empty());
    }

    #[test]
    fn test_not_an_image() {
        let err = extract_image_metadata(b"definitely not pixels").unwrap_err();
        assert!(matches!(err, DocsiftError::Parsing { .. }));
    }
}
