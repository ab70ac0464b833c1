//! Configuration loading and management.
//!
//! [`ExtractorConfig`] can be built programmatically or loaded from TOML, YAML
//! or JSON files. [`ExtractorConfig::discover`] looks for a `docsift.toml` in
//! the current directory and its parents.

use crate::{DocsiftError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Binary used when OCR is enabled without an explicit backend path.
pub const DEFAULT_OCR_BACKEND: &str = "tesseract";

/// Main extractor configuration.
///
/// # Example
///
/// ```rust
/// use docsift::ExtractorConfig;
///
/// let config = ExtractorConfig::default();
/// assert!(config.ocr.is_none());
/// assert!(!config.strict_formats);
///
/// // let config = ExtractorConfig::from_toml_file("docsift.toml")?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Initial OCR configuration (None = OCR disabled)
    #[serde(default)]
    pub ocr: Option<OcrConfig>,

    /// Fail with `UnsupportedFormat` when no decoder handles the content type,
    /// instead of returning an empty document.
    #[serde(default)]
    pub strict_formats: bool,

    /// Maximum nesting depth for embedded documents (archives inside archives).
    #[serde(default = "default_max_embedded_depth")]
    pub max_embedded_depth: usize,

    /// Number of leading bytes inspected by content sniffing.
    #[serde(default = "default_detection_peek_bytes")]
    pub detection_peek_bytes: usize,

    /// Remote (URI) fetch settings
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// OCR backend configuration.
///
/// Presence of this struct means OCR is enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Path (or bare name resolved through `PATH`) of the OCR executable.
    #[serde(default = "default_backend_path")]
    pub backend_path: PathBuf,

    /// Language code (e.g., "eng", "deu")
    #[serde(default = "default_eng")]
    pub language: String,

    /// Extra arguments appended to the backend command line.
    #[serde(default)]
    pub extra_args: Vec<String>,

    /// Seconds the backend may run before it is killed.
    #[serde(default = "default_ocr_timeout_secs")]
    pub timeout_secs: u64,
}

/// Settings for fetching `http`/`https` URIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Request timeout in seconds. Covers connect and body read.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Honour `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` from the environment.
    #[serde(default = "default_true")]
    pub use_system_proxy: bool,
}

fn default_max_embedded_depth() -> usize {
    8
}
fn default_detection_peek_bytes() -> usize {
    8192
}
fn default_backend_path() -> PathBuf {
    PathBuf::from(DEFAULT_OCR_BACKEND)
}
fn default_eng() -> String {
    "eng".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_ocr_timeout_secs() -> u64 {
    120
}
fn default_true() -> bool {
    true
}
fn default_user_agent() -> String {
    format!("docsift/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            ocr: None,
            strict_formats: false,
            max_embedded_depth: default_max_embedded_depth(),
            detection_peek_bytes: default_detection_peek_bytes(),
            remote: RemoteConfig::default(),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self::new(default_backend_path())
    }
}

impl OcrConfig {
    /// OCR configuration for the given backend executable with default language.
    pub fn new(backend_path: impl Into<PathBuf>) -> Self {
        Self {
            backend_path: backend_path.into(),
            language: default_eng(),
            extra_args: Vec::new(),
            timeout_secs: default_ocr_timeout_secs(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            use_system_proxy: default_true(),
        }
    }
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ExtractorConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `DocsiftError::Validation` if the file can't be read or is invalid TOML.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;

        toml::from_str(&content)
            .map_err(|e| DocsiftError::validation(format!("Invalid TOML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;

        serde_yaml_ng::from_str(&content)
            .map_err(|e| DocsiftError::validation(format!("Invalid YAML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;

        serde_json::from_str(&content)
            .map_err(|e| DocsiftError::validation(format!("Invalid JSON in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration, choosing the format from the file extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Self::from_toml_file(path),
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(DocsiftError::validation(format!(
                "Unsupported config file format: {}",
                path.display()
            ))),
        }
    }

    /// Discover configuration file in parent directories.
    ///
    /// Searches for `docsift.toml` in current directory and parent directories.
    pub fn discover() -> Result<Option<Self>> {
        let current = std::env::current_dir().map_err(DocsiftError::Io)?;
        Self::discover_from(&current)
    }

    /// Like [`discover`](Self::discover), starting from `start` instead of the
    /// current directory.
    pub fn discover_from(start: &Path) -> Result<Option<Self>> {
        let mut current = Some(start);

        while let Some(dir) = current {
            let candidate = dir.join("docsift.toml");
            if candidate.is_file() {
                tracing::debug!("Loading configuration from {}", candidate.display());
                return Ok(Some(Self::from_toml_file(candidate)?));
            }
            current = dir.parent();
        }

        Ok(None)
    }
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| DocsiftError::validation(format!("Failed to read config file {}: {}", path.display(), e)))
}
