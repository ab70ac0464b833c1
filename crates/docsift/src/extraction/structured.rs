//! Structured data extraction (JSON, YAML, TOML).
//!
//! All three formats are normalized to a `serde_json::Value` tree and
//! flattened into `path: value` lines. Top-level string fields with common
//! descriptive names (`title`, `description`, ...) are surfaced as metadata.
//!
//! # Example
//!
//! ```rust
//! use docsift::extraction::structured::parse_json;
//!
//! # fn example() -> docsift::Result<()> {
//! let json = br#"{"title": "Example", "tags": ["a", "b"]}"#;
//! let result = parse_json(json)?;
//!
//! assert!(result.content.contains("title: Example"));
//! assert!(result.content.contains("tags[1]: b"));
//! assert_eq!(result.field_count, 3);
//! # Ok(())
//! # }
//! ```

use crate::{DocsiftError, Result};
use indexmap::IndexMap;
use serde_json::Value;

/// Nesting deeper than this is not flattened.
const MAX_DEPTH: usize = 10;

const TEXT_FIELD_KEYWORDS: &[&str] = &[
    "title",
    "name",
    "subject",
    "description",
    "author",
    "summary",
    "version",
];

#[derive(Debug, Clone)]
pub struct StructuredDataResult {
    pub content: String,
    pub format: &'static str,
    /// Number of scalar values flattened into `content`.
    pub field_count: usize,
    /// Descriptive top-level string fields.
    pub text_fields: IndexMap<String, String>,
}

pub fn parse_json(data: &[u8]) -> Result<StructuredDataResult> {
    let value: Value =
        serde_json::from_slice(data).map_err(|e| DocsiftError::parsing_with_source("Failed to parse JSON", e))?;
    Ok(flatten_document(&value, "json"))
}

pub fn parse_yaml(data: &[u8]) -> Result<StructuredDataResult> {
    let value: Value =
        serde_yaml_ng::from_slice(data).map_err(|e| DocsiftError::parsing_with_source("Failed to parse YAML", e))?;
    Ok(flatten_document(&value, "yaml"))
}

pub fn parse_toml(data: &[u8]) -> Result<StructuredDataResult> {
    let text = std::str::from_utf8(data).map_err(|e| DocsiftError::parsing_with_source("TOML is not UTF-8", e))?;
    let table: toml::Table =
        toml::from_str(text).map_err(|e| DocsiftError::parsing_with_source("Failed to parse TOML", e))?;
    Ok(flatten_document(&toml_to_json(toml::Value::Table(table)), "toml"))
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(table.into_iter().map(|(k, v)| (k, toml_to_json(v))).collect()),
    }
}

fn flatten_document(value: &Value, format: &'static str) -> StructuredDataResult {
    let mut lines = Vec::new();
    flatten_value(value, "", 0, &mut lines);

    let mut text_fields = IndexMap::new();
    if let Value::Object(map) = value {
        for (key, field) in map {
            if let Value::String(s) = field
                && !s.trim().is_empty()
                && TEXT_FIELD_KEYWORDS.contains(&key.to_lowercase().as_str())
            {
                text_fields.insert(key.clone(), s.clone());
            }
        }
    }

    StructuredDataResult {
        field_count: lines.len(),
        content: lines.join("\n"),
        format,
        text_fields,
    }
}

fn flatten_value(value: &Value, prefix: &str, depth: usize, lines: &mut Vec<String>) {
    if depth > MAX_DEPTH {
        return;
    }

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_value(child, &path, depth + 1, lines);
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                let path = if prefix.is_empty() {
                    format!("item_{}", i)
                } else {
                    format!("{}[{}]", prefix, i)
                };
                flatten_value(item, &path, depth + 1, lines);
            }
        }
        Value::String(s) if s.trim().is_empty() => {}
        Value::Null => {}
        scalar => {
            let rendered = match scalar {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            if prefix.is_empty() {
                lines.push(rendered);
            } else {
                lines.push(format!("{}: {}", prefix, rendered));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_nested() {
        let json = br#"{"title": "Report", "meta": {"pages": 3, "draft": false}, "empty": ""}"#;
        let result = parse_json(json).unwrap();

        assert_eq!(result.format, "json");
        assert_eq!(result.content, "title: Report\nmeta.pages: 3\nmeta.draft: false");
        assert_eq!(result.field_count, 3);
        assert_eq!(result.text_fields.get("title").map(String::as_str), Some("Report"));
    }

    #[test]
    fn test_parse_json_top_level_array() {
        let result = parse_json(br#"["alpha", {"name": "beta"}]"#).unwrap();
        assert_eq!(result.content, "item_0: alpha\nitem_1.name: beta");
        assert!(result.text_fields.is_empty());
    }

    #[test]
    fn test_parse_json_invalid() {
        let err = parse_json(b"{not json").unwrap_err();
        assert!(matches!(err, DocsiftError::Parsing { .. }));
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = b"name: docsift\nfeatures:\n  - pdf\n  - html\n";
        let result = parse_yaml(yaml).unwrap();

        assert_eq!(result.format, "yaml");
        assert!(result.content.contains("name: docsift"));
        assert!(result.content.contains("features[1]: html"));
        assert_eq!(result.text_fields.get("name").map(String::as_str), Some("docsift"));
    }

    #[test]
    fn test_parse_toml_with_datetime() {
        let toml = b"title = \"Config\"\n[server]\nport = 8080\nstarted = 1979-05-27T07:32:00Z\n";
        let result = parse_toml(toml).unwrap();

        assert_eq!(result.format, "toml");
        assert!(result.content.contains("title: Config"));
        assert!(result.content.contains("server.port: 8080"));
        assert!(result.content.contains("server.started: 1979-05-27T07:32:00Z"));
    }

    #[test]
    fn test_parse_toml_invalid() {
        let err = parse_toml(b"key = [unclosed").unwrap_err();
        assert!(matches!(err, DocsiftError::Parsing { .. }));
    }

    #[test]
    fn test_depth_limit() {
        let mut json = String::from("\"deep\"");
        for _ in 0..20 {
            json = format!("{{\"k\": {}}}", json);
        }
        let result = parse_json(json.as_bytes()).unwrap();
        assert!(result.content.is_empty());
        assert_eq!(result.field_count, 0);
    }
}
