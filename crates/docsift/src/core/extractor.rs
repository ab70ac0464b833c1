//! Extraction orchestrator.
//!
//! [`Extractor`] is the public entry point. Every operation builds a
//! [`StreamSource`] and funnels it through [`Extractor::extract`], which owns
//! the per-call metadata, the stream handle and the failure boundary.

use crate::core::assembler::assemble;
use crate::core::backend::AutoDetectBackend;
use crate::core::config::{ExtractorConfig, OcrConfig};
use crate::core::ocr::OcrSettings;
use crate::core::source::{BytesSource, FileSource, StreamSource, UriSource};
use crate::plugins::{Detector, ParseContext, ParsingBackend, TextSink};
use crate::types::{ExtractionResult, Metadata};
use crate::{DocsiftError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

struct Inner {
    backend: Arc<dyn ParsingBackend>,
    config: Arc<ExtractorConfig>,
    ocr: OcrSettings,
}

/// Extracts text and metadata from files, byte buffers and URIs.
///
/// Cloning is cheap; clones share the backend and OCR settings.
///
/// # Example
///
/// ```rust
/// use docsift::Extractor;
///
/// # fn main() -> docsift::Result<()> {
/// let extractor = Extractor::new();
/// let result = extractor.extract_bytes_with_hints(b"# Notes\n\nbuy milk", "notes.md", "")?;
///
/// assert_eq!(result.content_type(), "text/markdown");
/// assert!(result.text().contains("buy milk"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Extractor {
    inner: Arc<Inner>,
}

impl Extractor {
    /// Extractor with the built-in decoders and default configuration.
    pub fn new() -> Self {
        Self::with_config(ExtractorConfig::default())
    }

    pub fn with_config(config: ExtractorConfig) -> Self {
        let backend = Arc::new(AutoDetectBackend::with_config(&config));
        Self::with_backend(backend, config)
    }

    /// Extractor delegating all parsing to `backend`.
    pub fn with_backend(backend: Arc<dyn ParsingBackend>, config: ExtractorConfig) -> Self {
        let ocr = OcrSettings::new(config.ocr.clone());
        Self {
            inner: Arc::new(Inner {
                backend,
                config: Arc::new(config),
                ocr,
            }),
        }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.inner.config
    }

    pub fn backend(&self) -> &Arc<dyn ParsingBackend> {
        &self.inner.backend
    }

    /// Extract from a file on disk.
    ///
    /// # Errors
    ///
    /// Any failure is reported as `DocsiftError::Extraction` naming the path.
    pub fn extract_file(&self, path: impl AsRef<Path>) -> Result<ExtractionResult> {
        self.extract(&FileSource::new(path.as_ref()))
    }

    /// Extract from an in-memory buffer, sniffing the content type.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<ExtractionResult> {
        self.extract_bytes_with_hints(data, "", crate::core::mime::OCTET_STREAM_MIME_TYPE)
    }

    /// Extract from an in-memory buffer with caller hints.
    ///
    /// A non-generic `content_type` is used verbatim. Otherwise the type is
    /// sniffed, with `file_name` (when non-empty) as an extension hint.
    pub fn extract_bytes_with_hints(&self, data: &[u8], file_name: &str, content_type: &str) -> Result<ExtractionResult> {
        self.extract(&BytesSource::with_hints(data, file_name, Some(content_type)))
    }

    /// Extract from a `file`, `http` or `https` URI.
    pub fn extract_uri(&self, uri: &Url) -> Result<ExtractionResult> {
        self.extract(&UriSource::with_remote_config(uri.clone(), self.inner.config.remote.clone()))
    }

    /// Parse `uri` and extract from it.
    ///
    /// # Errors
    ///
    /// An unparseable URI is reported as `DocsiftError::Extraction` wrapping a
    /// `Validation` error.
    pub fn extract_uri_str(&self, uri: &str) -> Result<ExtractionResult> {
        let parsed = Url::parse(uri).map_err(|e| {
            DocsiftError::extraction(
                format!("extraction of text from uri '{}' failed", uri),
                DocsiftError::validation_with_source(format!("Invalid URI: {}", uri), e),
            )
        })?;
        self.extract_uri(&parsed)
    }

    /// Extract from any stream source.
    ///
    /// The stream handle is released before this returns, on success and on
    /// failure alike.
    #[tracing::instrument(level = "debug", skip_all, fields(source = %source.describe()))]
    pub fn extract(&self, source: &dyn StreamSource) -> Result<ExtractionResult> {
        self.run(source)
            .map_err(|e| DocsiftError::extraction(source.failure_message(), e))
    }

    fn run(&self, source: &dyn StreamSource) -> Result<ExtractionResult> {
        let mut metadata = Metadata::new();
        let mut sink = TextSink::new();
        let ctx = ParseContext::new(
            Arc::clone(&self.inner.backend),
            Arc::clone(&self.inner.config),
            self.inner.ocr.snapshot(),
        );

        let detector: &dyn Detector = self.inner.backend.as_ref();
        source.prepare(&mut metadata, detector)?;

        {
            let mut stream = source.open(&mut metadata)?;
            self.inner.backend.parse(&mut stream, &mut metadata, &mut sink, &ctx)?;
        }

        assemble(sink.into_text(), metadata)
    }

    /// Point OCR at `path` and enable it.
    pub fn set_ocr_backend_path(&self, path: impl Into<PathBuf>) {
        self.inner.ocr.set_backend_path(path);
    }

    /// Enable OCR with the last configured backend path, or disable it.
    pub fn set_ocr_enabled(&self, enabled: bool) {
        self.inner.ocr.set_enabled(enabled);
    }

    pub fn ocr_enabled(&self) -> bool {
        self.inner.ocr.is_enabled()
    }

    pub fn ocr_backend_path(&self) -> PathBuf {
        self.inner.ocr.backend_path()
    }

    /// OCR configuration the next extraction will use, if OCR is enabled.
    pub fn ocr_config(&self) -> Option<OcrConfig> {
        self.inner.ocr.snapshot()
    }
}

#[cfg(feature = "tokio-runtime")]
impl Extractor {
    /// Async variant of [`extract_file`](Self::extract_file).
    pub async fn extract_file_async(&self, path: impl AsRef<Path>) -> Result<ExtractionResult> {
        let path = path.as_ref().to_path_buf();
        self.spawn(move |extractor| extractor.extract_file(&path)).await
    }

    /// Async variant of [`extract_bytes`](Self::extract_bytes).
    pub async fn extract_bytes_async(&self, data: Vec<u8>) -> Result<ExtractionResult> {
        self.spawn(move |extractor| extractor.extract_bytes(&data)).await
    }

    /// Async variant of [`extract_bytes_with_hints`](Self::extract_bytes_with_hints).
    pub async fn extract_bytes_with_hints_async(
        &self,
        data: Vec<u8>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Result<ExtractionResult> {
        let file_name = file_name.into();
        let content_type = content_type.into();
        self.spawn(move |extractor| extractor.extract_bytes_with_hints(&data, &file_name, &content_type))
            .await
    }

    /// Async variant of [`extract_uri`](Self::extract_uri).
    pub async fn extract_uri_async(&self, uri: Url) -> Result<ExtractionResult> {
        self.spawn(move |extractor| extractor.extract_uri(&uri)).await
    }

    async fn spawn<F>(&self, task: F) -> Result<ExtractionResult>
    where
        F: FnOnce(Extractor) -> Result<ExtractionResult> + Send + 'static,
    {
        let extractor = self.clone();
        tokio::task::spawn_blocking(move || task(extractor))
            .await
            .map_err(|e| DocsiftError::Other(format!("Extraction task failed: {}", e)))?
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extractor")
            .field("config", &self.inner.config)
            .field("ocr", &self.inner.ocr.snapshot())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::source::StreamHandle;
    use crate::types::keys;
    use std::io::{Cursor, Read};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::NamedTempFile;

    struct SilentBackend;

    impl Detector for SilentBackend {
        fn detect(&self, _stream: &mut dyn Read, _metadata: &Metadata) -> Result<String> {
            Ok("application/octet-stream".to_string())
        }
    }

    impl ParsingBackend for SilentBackend {
        fn parse(
            &self,
            _stream: &mut dyn Read,
            _metadata: &mut Metadata,
            sink: &mut TextSink,
            _ctx: &ParseContext,
        ) -> Result<()> {
            sink.push("forgot the content type");
            Ok(())
        }
    }

    struct RecordingBackend {
        calls: AtomicUsize,
        last_ocr: parking_lot::Mutex<Option<OcrConfig>>,
    }

    impl Detector for RecordingBackend {
        fn detect(&self, _stream: &mut dyn Read, _metadata: &Metadata) -> Result<String> {
            Ok("text/plain".to_string())
        }
    }

    impl ParsingBackend for RecordingBackend {
        fn parse(
            &self,
            _stream: &mut dyn Read,
            metadata: &mut Metadata,
            _sink: &mut TextSink,
            ctx: &ParseContext,
        ) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_ocr.lock() = ctx.ocr.clone();
            metadata.set(keys::CONTENT_TYPE, "text/plain");
            Ok(())
        }
    }

    struct StaticSource;

    impl StreamSource for StaticSource {
        fn prepare(&self, _metadata: &mut Metadata, _detector: &dyn Detector) -> Result<()> {
            Ok(())
        }

        fn open(&self, _metadata: &mut Metadata) -> Result<StreamHandle<'_>> {
            Ok(StreamHandle::new(Cursor::new(b"static".to_vec()), "static"))
        }

        fn describe(&self) -> String {
            "static".to_string()
        }
    }

    #[test]
    fn test_extract_bytes_with_hint() {
        let extractor = Extractor::new();
        let result = extractor
            .extract_bytes_with_hints(b"just words", "", "text/plain; charset=utf-8")
            .unwrap();

        assert_eq!(result.text(), "just words");
        assert_eq!(result.content_type(), "text/plain; charset=utf-8");
        assert_eq!(result.metadata_value(keys::PARSED_BY), Some("plain-text-decoder"));
    }

    #[test]
    fn test_extract_bytes_sniffs() {
        let extractor = Extractor::new();
        let result = extractor.extract_bytes(b"<?xml version=\"1.0\"?><a>b</a>").unwrap();
        assert_eq!(result.content_type(), "text/xml");
        assert_eq!(result.text(), "b");
    }

    #[test]
    fn test_extract_file_records_path() {
        let mut file = NamedTempFile::with_suffix(".txt").unwrap();
        std::io::Write::write_all(&mut file, b"on disk").unwrap();

        let result = Extractor::new().extract_file(file.path()).unwrap();

        assert_eq!(result.text(), "on disk");
        assert_eq!(
            result.metadata_value(keys::FILE_PATH),
            Some(file.path().to_string_lossy().as_ref())
        );
        assert_eq!(result.metadata_value(keys::CONTENT_LENGTH), Some("7"));
    }

    #[test]
    fn test_missing_file_is_wrapped() {
        let err = Extractor::new().extract_file("/no/such/docsift/file.txt").unwrap_err();

        assert!(matches!(err, DocsiftError::Extraction { .. }));
        assert_eq!(
            err.to_string(),
            "extraction of text from file '/no/such/docsift/file.txt' failed"
        );
        assert!(matches!(err.root_cause(), DocsiftError::Io(_)));
    }

    #[test]
    fn test_invalid_uri_string() {
        let err = Extractor::new().extract_uri_str("not a uri").unwrap_err();

        assert_eq!(err.to_string(), "extraction of text from uri 'not a uri' failed");
        assert!(matches!(err.root_cause(), DocsiftError::Validation { .. }));
    }

    #[test]
    fn test_missing_content_type_passes_through() {
        let extractor = Extractor::with_backend(Arc::new(SilentBackend), ExtractorConfig::default());
        let err = extractor.extract(&StaticSource).unwrap_err();
        assert!(matches!(err, DocsiftError::InvariantViolation(_)));
    }

    #[test]
    fn test_ocr_snapshot_reaches_backend() {
        let backend = Arc::new(RecordingBackend {
            calls: AtomicUsize::new(0),
            last_ocr: parking_lot::Mutex::new(None),
        });
        let extractor = Extractor::with_backend(backend.clone(), ExtractorConfig::default());

        extractor.extract(&StaticSource).unwrap();
        assert!(backend.last_ocr.lock().is_none());

        extractor.set_ocr_backend_path("/opt/ocr/bin/tesseract");
        extractor.extract(&StaticSource).unwrap();
        assert_eq!(
            backend.last_ocr.lock().as_ref().map(|c| c.backend_path.clone()),
            Some(PathBuf::from("/opt/ocr/bin/tesseract"))
        );

        extractor.set_ocr_enabled(false);
        extractor.extract(&StaticSource).unwrap();
        assert!(backend.last_ocr.lock().is_none());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_ocr_accessors() {
        let extractor = Extractor::new();
        assert!(!extractor.ocr_enabled());
        assert!(extractor.ocr_config().is_none());

        extractor.set_ocr_enabled(true);
        assert!(extractor.ocr_enabled());
        assert_eq!(extractor.ocr_backend_path(), PathBuf::from("tesseract"));

        let clone = extractor.clone();
        clone.set_ocr_enabled(false);
        assert!(!extractor.ocr_enabled());
    }

    #[test]
    fn test_initial_ocr_from_config() {
        let config = ExtractorConfig {
            ocr: Some(OcrConfig::new("/usr/local/bin/tesseract")),
            ..Default::default()
        };
        let extractor = Extractor::with_config(config);
        assert!(extractor.ocr_enabled());
        assert_eq!(extractor.ocr_backend_path(), PathBuf::from("/usr/local/bin/tesseract"));
    }
}
