//! HTML to Markdown conversion.
//!
//! Uses `html-to-markdown-rs` with metadata extraction enabled. Document
//! metadata (`<title>`, `<meta>` tags, canonical links) comes back as YAML
//! frontmatter, which is split off and mapped to metadata field names.
//!
//! # Example
//!
//! ```rust
//! use docsift::extraction::html::process_html;
//!
//! # fn example() -> docsift::Result<()> {
//! let html = r#"<html><head><title>Guide</title></head><body><h1>Intro</h1><p>Read <strong>this</strong>.</p></body></html>"#;
//! let result = process_html(html)?;
//!
//! assert!(result.markdown.contains("# Intro"));
//! assert_eq!(result.metadata.get("title").map(String::as_str), Some("Guide"));
//! # Ok(())
//! # }
//! ```

use crate::{DocsiftError, Result};
use html_to_markdown_rs::{ConversionOptions, PreprocessingOptions, convert as convert_html};
use indexmap::IndexMap;
use std::{any::Any, thread};

const LARGE_HTML_STACK_THRESHOLD_BYTES: usize = 512 * 1024;
const HTML_CONVERSION_STACK_SIZE_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, Default)]
pub struct HtmlParseResult {
    pub markdown: String,
    pub metadata: IndexMap<String, String>,
}

fn conversion_options() -> ConversionOptions {
    ConversionOptions {
        extract_metadata: true,
        hocr_spatial_tables: false,
        preprocessing: PreprocessingOptions {
            enabled: false,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn convert_with_options(html: &str, options: ConversionOptions) -> Result<String> {
    convert_html(html, Some(options))
        .map_err(|e| DocsiftError::parsing(format!("Failed to convert HTML to Markdown: {}", e)))
}

/// Deeply nested markup recurses hard; large inputs get a thread with a big stack.
fn run_on_dedicated_stack<T, F>(job: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let handle = thread::Builder::new()
        .name("docsift-html-conversion".to_string())
        .stack_size(HTML_CONVERSION_STACK_SIZE_BYTES)
        .spawn(job)
        .map_err(|err| DocsiftError::Other(format!("Failed to spawn HTML conversion thread: {}", err)))?;

    match handle.join() {
        Ok(result) => result,
        Err(panic) => Err(DocsiftError::Other(format!(
            "HTML conversion panicked: {}",
            panic_reason(&panic)
        ))),
    }
}

fn panic_reason(panic: &Box<dyn Any + Send + 'static>) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

pub fn convert_html_to_markdown(html: &str) -> Result<String> {
    let options = conversion_options();
    if html.len() >= LARGE_HTML_STACK_THRESHOLD_BYTES {
        let owned = html.to_string();
        run_on_dedicated_stack(move || convert_with_options(&owned, options))
    } else {
        convert_with_options(html, options)
    }
}

/// Convert HTML and split the metadata frontmatter from the Markdown body.
pub fn process_html(html: &str) -> Result<HtmlParseResult> {
    let converted = convert_html_to_markdown(html)?;
    let (metadata, markdown) = parse_html_metadata(&converted)?;
    Ok(HtmlParseResult { markdown, metadata })
}

/// Split YAML frontmatter off `markdown` and map its keys to metadata names.
pub fn parse_html_metadata(markdown: &str) -> Result<(IndexMap<String, String>, String)> {
    let Some(after_opening) = markdown
        .strip_prefix("---\n")
        .or_else(|| markdown.strip_prefix("---\r\n"))
    else {
        return Ok((IndexMap::new(), markdown.to_string()));
    };

    let (yaml_content, remaining_content) = if let Some(rest) = after_opening.strip_prefix("---\n") {
        ("", rest)
    } else if let Some(rest) = after_opening.strip_prefix("---\r\n") {
        ("", rest)
    } else if let Some(pos) = after_opening.find("\n---\n") {
        (&after_opening[..pos], &after_opening[pos + 5..])
    } else if let Some(pos) = after_opening.find("\r\n---\r\n") {
        (&after_opening[..pos], &after_opening[pos + 7..])
    } else {
        return Ok((IndexMap::new(), markdown.to_string()));
    };

    let remaining_content = remaining_content.trim_start_matches(['\r', '\n']).to_string();
    let mut metadata = IndexMap::new();

    if yaml_content.trim().is_empty() {
        return Ok((metadata, remaining_content));
    }

    let yaml_value: serde_json::Value = serde_yaml_ng::from_str(yaml_content)
        .map_err(|e| DocsiftError::parsing_with_source("Failed to parse YAML frontmatter", e))?;

    if let serde_json::Value::Object(mapping) = yaml_value {
        for (key, value) in mapping {
            let serde_json::Value::String(value) = value else {
                continue;
            };
            let Some(name) = metadata_name(&key) else {
                continue;
            };
            let value = if name == "keywords" {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ")
            } else {
                value
            };
            if !value.is_empty() {
                metadata.insert(name.to_string(), value);
            }
        }
    }

    Ok((metadata, remaining_content))
}

fn metadata_name(frontmatter_key: &str) -> Option<&'static str> {
    let name = match frontmatter_key {
        "title" => "title",
        "meta-description" => "description",
        "meta-keywords" => "keywords",
        "meta-author" => "author",
        "base-href" => "base_href",
        "canonical" => "canonical",
        "meta-og-title" | "meta-og:title" => "og:title",
        "meta-og-description" | "meta-og:description" => "og:description",
        "meta-og-image" | "meta-og:image" => "og:image",
        "meta-og-url" | "meta-og:url" => "og:url",
        "meta-og-type" | "meta-og:type" => "og:type",
        "meta-og-site-name" | "meta-og:site-name" | "meta-og:site_name" => "og:site_name",
        "meta-twitter-card" | "meta-twitter:card" => "twitter:card",
        "meta-twitter-title" | "meta-twitter:title" => "twitter:title",
        "meta-twitter-description" | "meta-twitter:description" => "twitter:description",
        "link-license" => "license",
        _ => return None,
    };
    Some(name)
}
