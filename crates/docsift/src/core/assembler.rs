//! Builds the immutable [`ExtractionResult`] from parser output.

use crate::types::{ExtractionResult, Metadata, keys};
use crate::{DocsiftError, Result};

/// Combine emitted text and final metadata into a result.
///
/// `content_type` is the first `Content-Type` value, which is also the
/// leading value of the flattened field.
///
/// # Errors
///
/// Returns `DocsiftError::InvariantViolation` if `Content-Type` is absent.
/// Backends must always set it, so this indicates a defect.
pub fn assemble(text: String, metadata: Metadata) -> Result<ExtractionResult> {
    let content_type = metadata
        .get(keys::CONTENT_TYPE)
        .map(str::to_string)
        .ok_or_else(|| {
            DocsiftError::InvariantViolation(
                "parsing backend returned without setting Content-Type".to_string(),
            )
        })?;

    Ok(ExtractionResult::new(text, content_type, metadata.flatten()))
}
