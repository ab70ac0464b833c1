use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Well-known metadata field names.
pub mod keys {
    /// Effective content type of the document.
    pub const CONTENT_TYPE: &str = "Content-Type";
    /// Byte length of the source, when known.
    pub const CONTENT_LENGTH: &str = "Content-Length";
    /// Source marker for file-path extractions.
    pub const FILE_PATH: &str = "FilePath";
    /// Source marker for URI extractions.
    pub const URI: &str = "Uri";
    /// File name (basename only) used by detectors as an extension hint.
    pub const RESOURCE_NAME: &str = "resourceName";
    /// Raw file-name argument exactly as the caller supplied it.
    pub const RESOURCE_NAME_HINT: &str = "resourceNameHint";
    /// Name of every decoder that contributed to the result.
    pub const PARSED_BY: &str = "X-Parsed-By";
}

/// Per-call metadata carrier.
///
/// A multimap from field name to an ordered list of values. Field order and
/// value order both follow insertion order, so the flattened view is stable
/// across repeated extractions of the same input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    fields: IndexMap<String, Vec<String>>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to `name`, keeping previously recorded values.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.entry(name.into()).or_default().push(value.into());
    }

    /// Replace all values of `name` with a single value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), vec![value.into()]);
    }

    /// First value recorded for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn get_all(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.get(name).is_some_and(|values| !values.is_empty())
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.fields.shift_remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Collapse every multi-valued field into one comma-joined string.
    pub fn flatten(&self) -> IndexMap<String, String> {
        self.fields
            .iter()
            .map(|(name, values)| (name.clone(), values.join(", ")))
            .collect()
    }
}

/// Result of a successful extraction.
///
/// Immutable once built: `content_type` always equals the leading value of the
/// `Content-Type` entry in `metadata`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    text: String,
    content_type: String,
    metadata: IndexMap<String, String>,
}

impl ExtractionResult {
    pub(crate) fn new(text: String, content_type: String, metadata: IndexMap<String, String>) -> Self {
        Self {
            text,
            content_type,
            metadata,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn metadata(&self) -> &IndexMap<String, String> {
        &self.metadata
    }

    /// Flattened value of a single metadata field.
    pub fn metadata_value(&self, name: &str) -> Option<&str> {
        self.metadata.get(name).map(String::as_str)
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
