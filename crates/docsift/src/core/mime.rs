//! MIME type detection helpers.
//!
//! Detection combines three signals, strongest first:
//! 1. magic bytes (via `infer`),
//! 2. the resource name's extension,
//! 3. a small text heuristic for content without a magic signature.
//!
//! Anything still undetermined is reported as [`OCTET_STREAM_MIME_TYPE`], the
//! generic placeholder.

use crate::{DocsiftError, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

pub const OCTET_STREAM_MIME_TYPE: &str = "application/octet-stream";
pub const HTML_MIME_TYPE: &str = "text/html";
pub const XHTML_MIME_TYPE: &str = "application/xhtml+xml";
pub const MARKDOWN_MIME_TYPE: &str = "text/markdown";
pub const PDF_MIME_TYPE: &str = "application/pdf";
pub const PLAIN_TEXT_MIME_TYPE: &str = "text/plain";
pub const CSV_MIME_TYPE: &str = "text/csv";
pub const TSV_MIME_TYPE: &str = "text/tab-separated-values";
pub const JSON_MIME_TYPE: &str = "application/json";
pub const YAML_MIME_TYPE: &str = "application/x-yaml";
pub const TOML_MIME_TYPE: &str = "application/toml";
pub const XML_MIME_TYPE: &str = "application/xml";
pub const XML_TEXT_MIME_TYPE: &str = "text/xml";
pub const SVG_MIME_TYPE: &str = "image/svg+xml";
pub const ZIP_MIME_TYPE: &str = "application/zip";
pub const DOCX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const EXCEL_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const POWER_POINT_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Marker that identifies the generic placeholder type, compared case-insensitively.
const GENERIC_MARKER: &str = "octet-stream";

static EXT_TO_MIME: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();

    m.insert("txt", PLAIN_TEXT_MIME_TYPE);
    m.insert("text", PLAIN_TEXT_MIME_TYPE);
    m.insert("log", PLAIN_TEXT_MIME_TYPE);
    m.insert("md", MARKDOWN_MIME_TYPE);
    m.insert("markdown", MARKDOWN_MIME_TYPE);

    m.insert("pdf", PDF_MIME_TYPE);

    m.insert("html", HTML_MIME_TYPE);
    m.insert("htm", HTML_MIME_TYPE);
    m.insert("xhtml", XHTML_MIME_TYPE);

    m.insert("docx", DOCX_MIME_TYPE);
    m.insert("xlsx", EXCEL_MIME_TYPE);
    m.insert("pptx", POWER_POINT_MIME_TYPE);
    m.insert("odt", "application/vnd.oasis.opendocument.text");
    m.insert("ods", "application/vnd.oasis.opendocument.spreadsheet");
    m.insert("epub", "application/epub+zip");

    m.insert("bmp", "image/bmp");
    m.insert("gif", "image/gif");
    m.insert("jpg", "image/jpeg");
    m.insert("jpeg", "image/jpeg");
    m.insert("png", "image/png");
    m.insert("tiff", "image/tiff");
    m.insert("tif", "image/tiff");
    m.insert("webp", "image/webp");

    m.insert("csv", CSV_MIME_TYPE);
    m.insert("tsv", TSV_MIME_TYPE);
    m.insert("json", JSON_MIME_TYPE);
    m.insert("yaml", YAML_MIME_TYPE);
    m.insert("yml", YAML_MIME_TYPE);
    m.insert("toml", TOML_MIME_TYPE);
    m.insert("xml", XML_MIME_TYPE);
    m.insert("svg", SVG_MIME_TYPE);

    m.insert("eml", "message/rfc822");
    m.insert("zip", ZIP_MIME_TYPE);
    m.insert("tar", "application/x-tar");
    m.insert("gz", "application/gzip");
    m.insert("7z", "application/x-7z-compressed");

    m
});

/// Whether `mime_type` is the generic "unknown binary" placeholder.
///
/// An empty string counts as generic too: it asserts nothing about the content.
pub fn is_generic(mime_type: &str) -> bool {
    let trimmed = mime_type.trim();
    trimmed.is_empty() || trimmed.to_ascii_lowercase().contains(GENERIC_MARKER)
}

/// Strip parameters (`; charset=...`) and normalize case for registry lookups.
pub fn base_mime_type(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Basename of a caller-supplied file name, accepting both `/` and `\` separators.
pub fn file_name_of(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// MIME type implied by a resource name's extension.
pub fn mime_from_name(name: &str) -> Option<String> {
    let base = file_name_of(name);
    let (_, extension) = base.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }
    let extension = extension.to_lowercase();

    if let Some(mime_type) = EXT_TO_MIME.get(extension.as_str()) {
        return Some(mime_type.to_string());
    }

    mime_guess::from_ext(&extension).first().map(|mime| mime.to_string())
}

/// Detect MIME type from a file path.
///
/// Uses the file extension only; content is not inspected.
///
/// # Errors
///
/// Returns `DocsiftError::Validation` if the file doesn't exist (when `check_exists` is true).
/// Returns `DocsiftError::UnsupportedFormat` if the extension is unknown.
pub fn detect_mime_type(path: impl AsRef<Path>, check_exists: bool) -> Result<String> {
    let path = path.as_ref();

    if check_exists && !path.exists() {
        return Err(DocsiftError::validation(format!(
            "File does not exist: {}",
            path.display()
        )));
    }

    let name = path.file_name().and_then(|name| name.to_str()).unwrap_or_default();

    mime_from_name(name).ok_or_else(|| {
        DocsiftError::UnsupportedFormat(format!("Could not determine MIME type from file path: {}", path.display()))
    })
}

/// Detect the MIME type of a document from its leading bytes and optional name.
///
/// Magic bytes win, except for container or text signatures that a file
/// extension can refine (a `.docx` is a zip, an `.svg` is XML).
pub fn detect_mime_type_from_bytes(prefix: &[u8], resource_name: Option<&str>) -> String {
    let by_magic = infer::get(prefix).map(|kind| kind.mime_type());
    let by_name = resource_name.and_then(mime_from_name);

    match (by_magic, by_name) {
        (Some(magic), Some(name)) if is_refinable(magic) && !is_generic(&name) => name,
        (Some(magic), _) => magic.to_string(),
        (None, Some(name)) => name,
        (None, None) => sniff_text(prefix).unwrap_or(OCTET_STREAM_MIME_TYPE).to_string(),
    }
}

fn is_refinable(mime_type: &str) -> bool {
    matches!(
        mime_type,
        ZIP_MIME_TYPE | "application/x-zip-compressed" | PLAIN_TEXT_MIME_TYPE | XML_MIME_TYPE | XML_TEXT_MIME_TYPE
    )
}

/// Classify textual content without a magic signature.
fn sniff_text(prefix: &[u8]) -> Option<&'static str> {
    if prefix.is_empty() || prefix.contains(&0) {
        return None;
    }

    let text = match std::str::from_utf8(prefix) {
        Ok(text) => text,
        // A multi-byte character cut off by the peek window is still text.
        Err(e) if e.error_len().is_none() => std::str::from_utf8(&prefix[..e.valid_up_to()]).ok()?,
        Err(_) => return None,
    };

    let head = text.trim_start_matches('\u{feff}').trim_start().to_ascii_lowercase();

    if head.starts_with("<?xml") {
        if head.contains("<html") {
            return Some(XHTML_MIME_TYPE);
        }
        return Some(XML_MIME_TYPE);
    }
    if head.starts_with("<!doctype html") || head.starts_with("<html") {
        return Some(HTML_MIME_TYPE);
    }

    Some(PLAIN_TEXT_MIME_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_is_generic() {
        assert!(is_generic("application/octet-stream"));
        assert!(is_generic("Application/Octet-Stream"));
        assert!(is_generic("binary/octet-stream"));
        assert!(is_generic(""));
        assert!(is_generic("   "));
        assert!(!is_generic("application/pdf"));
        assert!(!is_generic("text/plain; charset=utf-8"));
    }

    #[test]
    fn test_base_mime_type() {
        assert_eq!(base_mime_type("Text/HTML; charset=UTF-8"), "text/html");
        assert_eq!(base_mime_type("application/pdf"), "application/pdf");
        assert_eq!(base_mime_type(""), "");
    }

    #[test]
    fn test_file_name_of() {
        assert_eq!(file_name_of("/var/data/report.pdf"), "report.pdf");
        assert_eq!(file_name_of("C:\\Users\\me\\notes.txt"), "notes.txt");
        assert_eq!(file_name_of("plain.md"), "plain.md");
        assert_eq!(file_name_of(""), "");
    }

    #[test]
    fn test_mime_from_name() {
        assert_eq!(mime_from_name("report.PDF").as_deref(), Some(PDF_MIME_TYPE));
        assert_eq!(mime_from_name("dir/notes.md").as_deref(), Some(MARKDOWN_MIME_TYPE));
        assert_eq!(mime_from_name("data.yml").as_deref(), Some(YAML_MIME_TYPE));
        assert_eq!(mime_from_name("README"), None);
        assert_eq!(mime_from_name("trailing."), None);
    }

    #[test]
    fn test_detect_mime_type_pdf() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.pdf");
        File::create(&file_path).unwrap();

        let mime = detect_mime_type(&file_path, true).unwrap();
        assert_eq!(mime, "application/pdf");
    }

    #[test]
    fn test_detect_mime_type_images() {
        let dir = tempdir().unwrap();

        let test_cases = vec![
            ("test.png", "image/png"),
            ("test.jpg", "image/jpeg"),
            ("test.jpeg", "image/jpeg"),
            ("test.gif", "image/gif"),
            ("test.bmp", "image/bmp"),
            ("test.webp", "image/webp"),
            ("test.tiff", "image/tiff"),
        ];

        for (filename, expected_mime) in test_cases {
            let file_path = dir.path().join(filename);
            File::create(&file_path).unwrap();
            let mime = detect_mime_type(&file_path, true).unwrap();
            assert_eq!(mime, expected_mime, "Failed for {}", filename);
        }
    }

    #[test]
    fn test_detect_mime_type_data_formats() {
        let dir = tempdir().unwrap();

        let test_cases = vec![
            ("test.json", JSON_MIME_TYPE),
            ("test.yaml", YAML_MIME_TYPE),
            ("test.toml", TOML_MIME_TYPE),
            ("test.xml", XML_MIME_TYPE),
            ("test.csv", CSV_MIME_TYPE),
        ];

        for (filename, expected_mime) in test_cases {
            let file_path = dir.path().join(filename);
            File::create(&file_path).unwrap();
            let mime = detect_mime_type(&file_path, true).unwrap();
            assert_eq!(mime, expected_mime, "Failed for {}", filename);
        }
    }

    #[test]
    fn test_detect_mime_type_missing_file() {
        let result = detect_mime_type("/nonexistent/file.pdf", true);
        assert!(matches!(result, Err(DocsiftError::Validation { .. })));
    }

    #[test]
    fn test_detect_mime_type_no_extension() {
        let result = detect_mime_type("/some/dir/Makefile", false);
        assert!(matches!(result, Err(DocsiftError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_bytes_magic_wins() {
        let pdf = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n1 0 obj\n";
        assert_eq!(detect_mime_type_from_bytes(pdf, None), PDF_MIME_TYPE);
        assert_eq!(detect_mime_type_from_bytes(pdf, Some("notes.txt")), PDF_MIME_TYPE);

        let png = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";
        assert_eq!(detect_mime_type_from_bytes(png, None), "image/png");
    }

    #[test]
    fn test_bytes_zip_refined_by_name() {
        let zip_header = b"PK\x03\x04\x14\x00\x00\x00\x08\x00";
        assert_eq!(detect_mime_type_from_bytes(zip_header, Some("bundle.zip")), ZIP_MIME_TYPE);
        assert_eq!(detect_mime_type_from_bytes(zip_header, Some("book.epub")), "application/epub+zip");
    }

    #[test]
    fn test_bytes_name_used_without_magic() {
        assert_eq!(
            detect_mime_type_from_bytes(b"# Title\n\nBody", Some("README.md")),
            MARKDOWN_MIME_TYPE
        );
        assert_eq!(detect_mime_type_from_bytes(b"{\"a\": 1}", Some("a.json")), JSON_MIME_TYPE);
    }

    #[test]
    fn test_bytes_text_heuristic() {
        assert_eq!(detect_mime_type_from_bytes(b"just some words", None), PLAIN_TEXT_MIME_TYPE);
        assert_eq!(
            detect_mime_type_from_bytes("caf\u{e9} cr\u{e8}me".as_bytes(), None),
            PLAIN_TEXT_MIME_TYPE
        );
    }

    #[test]
    fn test_bytes_truncated_utf8_is_still_text() {
        let mut bytes = "na\u{ef}ve ".as_bytes().to_vec();
        bytes.extend_from_slice(&"\u{20ac}".as_bytes()[..2]);
        assert_eq!(detect_mime_type_from_bytes(&bytes, None), PLAIN_TEXT_MIME_TYPE);
    }

    #[test]
    fn test_bytes_binary_is_generic() {
        let binary = [0x00u8, 0x9f, 0x92, 0x96, 0x00, 0x01];
        assert_eq!(detect_mime_type_from_bytes(&binary, None), OCTET_STREAM_MIME_TYPE);
        assert_eq!(detect_mime_type_from_bytes(&[], None), OCTET_STREAM_MIME_TYPE);
    }
}
