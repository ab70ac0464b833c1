//! Content-type resolution for byte-buffer inputs.
//!
//! A caller-supplied content type always wins. Sniffing runs only when the
//! hint is missing or names the generic `application/octet-stream` placeholder.

use crate::core::mime::{file_name_of, is_generic};
use crate::plugins::Detector;
use crate::types::{Metadata, keys};
use crate::{DocsiftError, Result};
use std::io::Cursor;

/// Decide the effective content type of `data` and record it in `metadata`.
///
/// Records `resourceName` (basename of `file_name`) and `resourceNameHint`
/// (the raw argument) when a file name is given. If detection still yields
/// the generic type, `Content-Type` is left unset for the backend to default.
///
/// # Errors
///
/// Returns `DocsiftError::Detection` when sniffing is needed but `data` is
/// empty, and propagates any error raised by the detector.
pub fn resolve_content_type(
    data: &[u8],
    file_name: &str,
    content_type_hint: Option<&str>,
    metadata: &mut Metadata,
    detector: &dyn Detector,
) -> Result<()> {
    if !file_name.is_empty() {
        let base_name = file_name_of(file_name);
        if !base_name.is_empty() {
            metadata.set(keys::RESOURCE_NAME, base_name);
        }
        metadata.set(keys::RESOURCE_NAME_HINT, file_name);
    }

    if let Some(hint) = content_type_hint
        && !is_generic(hint)
    {
        tracing::debug!(content_type = hint, "Using caller-supplied content type");
        metadata.set(keys::CONTENT_TYPE, hint);
        return Ok(());
    }

    if data.is_empty() {
        return Err(DocsiftError::detection(
            "Cannot open a detection stream over an empty buffer",
        ));
    }

    let mut detection_stream = Cursor::new(data);
    let detected = detector.detect(&mut detection_stream, metadata)?;

    if is_generic(&detected) {
        tracing::debug!("Content type could not be determined; leaving it to the parser");
    } else {
        tracing::debug!(content_type = %detected, "Using sniffed content type");
        metadata.set(keys::CONTENT_TYPE, detected);
    }

    Ok(())
}
