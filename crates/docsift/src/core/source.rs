//! Stream sources.
//!
//! A [`StreamSource`] turns one kind of input (file path, byte buffer, URI, or
//! anything a caller implements) into a single-use readable [`StreamHandle`].
//! Acquisition happens in two phases:
//!
//! 1. [`prepare`](StreamSource::prepare) seeds metadata (source markers, name
//!    hints, resolved content type) without consuming the stream,
//! 2. [`open`](StreamSource::open) produces the stream itself.

use crate::core::config::RemoteConfig;
use crate::core::io::open_file;
use crate::core::resolver::resolve_content_type;
use crate::plugins::Detector;
use crate::types::{Metadata, keys};
use crate::{DocsiftError, Result};
use std::fmt;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use url::Url;

/// Message used when a source has no more specific description of its failure.
pub const GENERIC_FAILURE_MESSAGE: &str = "extraction failed";

/// Scoped, single-use readable byte stream.
///
/// The underlying reader is released when the handle is dropped, which
/// happens exactly once.
pub struct StreamHandle<'a> {
    reader: Box<dyn Read + Send + 'a>,
    label: String,
}

impl<'a> StreamHandle<'a> {
    pub fn new(reader: impl Read + Send + 'a, label: impl Into<String>) -> Self {
        let label = label.into();
        tracing::trace!(source = %label, "Opened stream");
        Self {
            reader: Box::new(reader),
            label,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Read for StreamHandle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl Drop for StreamHandle<'_> {
    fn drop(&mut self) {
        tracing::trace!(source = %self.label, "Released stream");
    }
}

impl fmt::Debug for StreamHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamHandle").field("label", &self.label).finish_non_exhaustive()
    }
}

/// Two-phase stream acquisition contract.
///
/// Implement this to feed documents from custom storage into
/// [`Extractor::extract`](crate::Extractor::extract).
pub trait StreamSource: Send + Sync {
    /// Seed `metadata` before parsing. Must not consume the stream.
    fn prepare(&self, metadata: &mut Metadata, detector: &dyn Detector) -> Result<()>;

    /// Open the single-use stream. May record transport attributes such as
    /// `Content-Length`.
    fn open(&self, metadata: &mut Metadata) -> Result<StreamHandle<'_>>;

    /// Short human-readable name of the source, used in logs.
    fn describe(&self) -> String;

    /// Message of the error reported when extraction from this source fails.
    fn failure_message(&self) -> String {
        GENERIC_FAILURE_MESSAGE.to_string()
    }
}

/// A document on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StreamSource for FileSource {
    fn prepare(&self, metadata: &mut Metadata, _detector: &dyn Detector) -> Result<()> {
        metadata.set(keys::FILE_PATH, self.path.to_string_lossy());
        if let Some(name) = self.path.file_name() {
            metadata.set(keys::RESOURCE_NAME, name.to_string_lossy());
        }
        Ok(())
    }

    fn open(&self, metadata: &mut Metadata) -> Result<StreamHandle<'_>> {
        let (file, length) = open_file(&self.path)?;
        if let Some(length) = length {
            metadata.set(keys::CONTENT_LENGTH, length.to_string());
        }
        Ok(StreamHandle::new(BufReader::new(file), self.describe()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn failure_message(&self) -> String {
        format!("extraction of text from file '{}' failed", self.path.display())
    }
}

/// An in-memory document, optionally carrying a file-name and content-type hint.
#[derive(Debug, Clone)]
pub struct BytesSource<'a> {
    data: &'a [u8],
    hints: Option<Hints>,
}

#[derive(Debug, Clone)]
struct Hints {
    file_name: String,
    content_type: Option<String>,
}

impl<'a> BytesSource<'a> {
    /// Buffer without hints. Content-type resolution is left to the backend.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, hints: None }
    }

    /// Buffer with hints. `prepare` runs content-type resolution: a
    /// non-generic `content_type` is used verbatim, otherwise the bytes are
    /// sniffed.
    pub fn with_hints(data: &'a [u8], file_name: impl Into<String>, content_type: Option<&str>) -> Self {
        Self {
            data,
            hints: Some(Hints {
                file_name: file_name.into(),
                content_type: content_type.map(str::to_string),
            }),
        }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }
}

impl StreamSource for BytesSource<'_> {
    fn prepare(&self, metadata: &mut Metadata, detector: &dyn Detector) -> Result<()> {
        match &self.hints {
            Some(hints) => resolve_content_type(
                self.data,
                &hints.file_name,
                hints.content_type.as_deref(),
                metadata,
                detector,
            ),
            None => Ok(()),
        }
    }

    fn open(&self, metadata: &mut Metadata) -> Result<StreamHandle<'_>> {
        metadata.set(keys::CONTENT_LENGTH, self.data.len().to_string());
        Ok(StreamHandle::new(Cursor::new(self.data), self.describe()))
    }

    fn describe(&self) -> String {
        format!("byte buffer ({} bytes)", self.data.len())
    }
}

/// A document addressed by URI.
///
/// `file:` URIs are read from disk. `http`/`https` URIs are fetched when the
/// stream is opened (requires the `remote` feature). Other schemes fail.
#[derive(Debug, Clone)]
pub struct UriSource {
    uri: Url,
    remote: RemoteConfig,
}

impl UriSource {
    pub fn new(uri: Url) -> Self {
        Self::with_remote_config(uri, RemoteConfig::default())
    }

    pub fn with_remote_config(uri: Url, remote: RemoteConfig) -> Self {
        Self { uri, remote }
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    fn resource_name(&self) -> Option<&str> {
        self.uri
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty())
    }

    fn open_local(&self, metadata: &mut Metadata) -> Result<StreamHandle<'_>> {
        let path = self
            .uri
            .to_file_path()
            .map_err(|()| DocsiftError::validation(format!("URI does not name a local file: {}", self.uri)))?;

        let (file, length) = open_file(&path)?;
        if let Some(length) = length {
            metadata.set(keys::CONTENT_LENGTH, length.to_string());
        }
        Ok(StreamHandle::new(BufReader::new(file), self.describe()))
    }

    #[cfg(feature = "remote")]
    fn fetch(&self, metadata: &mut Metadata) -> Result<StreamHandle<'_>> {
        use crate::core::mime::is_generic;

        let mut builder = reqwest::blocking::Client::builder()
            .timeout(self.remote.timeout())
            .user_agent(self.remote.user_agent.as_str());
        if !self.remote.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| DocsiftError::remote_with_source("Failed to build HTTP client", e))?;

        tracing::debug!(uri = %self.uri, "Fetching remote document");

        let response = client
            .get(self.uri.clone())
            .send()
            .map_err(|e| DocsiftError::remote_with_source(format!("Request to {} failed", self.uri), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocsiftError::remote(format!("GET {} returned HTTP {}", self.uri, status)));
        }

        if !metadata.contains(keys::CONTENT_TYPE)
            && let Some(server_type) = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
            && !is_generic(server_type)
        {
            metadata.set(keys::CONTENT_TYPE, server_type);
        }

        if let Some(length) = response.content_length() {
            metadata.set(keys::CONTENT_LENGTH, length.to_string());
        }

        Ok(StreamHandle::new(response, self.describe()))
    }

    #[cfg(not(feature = "remote"))]
    fn fetch(&self, _metadata: &mut Metadata) -> Result<StreamHandle<'_>> {
        Err(DocsiftError::UnsupportedFormat(format!(
            "Fetching '{}' URIs requires the `remote` feature",
            self.uri.scheme()
        )))
    }
}

impl StreamSource for UriSource {
    fn prepare(&self, metadata: &mut Metadata, _detector: &dyn Detector) -> Result<()> {
        metadata.set(keys::URI, self.uri.as_str());
        if let Some(name) = self.resource_name() {
            metadata.set(keys::RESOURCE_NAME, name);
        }
        Ok(())
    }

    fn open(&self, metadata: &mut Metadata) -> Result<StreamHandle<'_>> {
        match self.uri.scheme() {
            "file" => self.open_local(metadata),
            "http" | "https" => self.fetch(metadata),
            other => Err(DocsiftError::UnsupportedFormat(format!("Unsupported URI scheme '{}'", other))),
        }
    }

    fn describe(&self) -> String {
        self.uri.to_string()
    }

    fn failure_message(&self) -> String {
        format!("extraction of text from uri '{}' failed", self.uri)
    }
}
