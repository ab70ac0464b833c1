//! Error types for docsift.
//!
//! Every fallible operation returns [`DocsiftError`]. Errors raised while a
//! document is being acquired, detected or decoded are caught once at the
//! extraction boundary and wrapped into [`DocsiftError::Extraction`], which
//! names the failed operation and keeps the original cause reachable through
//! [`std::error::Error::source`].
//!
//! # Error Handling Philosophy
//!
//! **Inside the pipeline** errors carry their specific kind:
//! - `Io` - file system errors (missing file, permission denied)
//! - `Remote` - URI fetch failures
//! - `Detection` - content-type sniffing could not run
//! - `Parsing` - a decoder could not decode the stream
//! - `Ocr` / `MissingDependency` - OCR backend failures
//! - `Plugin` - a decoder's `initialize` or `shutdown` hook failed
//!
//! **At the boundary** all of them become one `Extraction` error. The single
//! exception is `InvariantViolation`, which signals a defect in a parsing
//! backend and passes through unwrapped.
//!
//! # Example
//!
//! ```rust
//! use docsift::{DocsiftError, Extractor};
//!
//! let extractor = Extractor::new();
//! let err = extractor.extract_file("/nonexistent/report.pdf").unwrap_err();
//! assert!(matches!(err, DocsiftError::Extraction { .. }));
//! assert!(err.to_string().contains("/nonexistent/report.pdf"));
//! ```
use thiserror::Error;

/// Result type alias using `DocsiftError`.
pub type Result<T> = std::result::Result<T, DocsiftError>;

/// Main error type for all docsift operations.
#[derive(Debug, Error)]
pub enum DocsiftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing error: {message}")]
    Parsing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Detection error: {message}")]
    Detection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("OCR error: {message}")]
    Ocr {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Remote error: {message}")]
    Remote {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("Plugin error in '{plugin_name}': {message}")]
    Plugin { message: String, plugin_name: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A parsing backend broke its contract (for example it returned without
    /// setting `Content-Type`). Never wrapped into `Extraction`.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// The single caller-facing failure kind produced by the extraction boundary.
    #[error("{message}")]
    Extraction {
        message: String,
        #[source]
        source: Box<DocsiftError>,
    },

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for DocsiftError {
    fn from(err: serde_json::Error) -> Self {
        DocsiftError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml_ng::Error> for DocsiftError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        DocsiftError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<toml::de::Error> for DocsiftError {
    fn from(err: toml::de::Error) -> Self {
        DocsiftError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<url::ParseError> for DocsiftError {
    fn from(err: url::ParseError) -> Self {
        DocsiftError::Validation {
            message: format!("Invalid URI: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl DocsiftError {
    error_constructor!(parsing, Parsing);
    error_constructor!(detection, Detection);
    error_constructor!(ocr, Ocr);
    error_constructor!(validation, Validation);
    error_constructor!(serialization, Serialization);
    error_constructor!(remote, Remote);

    /// Wrap `cause` into the caller-facing extraction failure.
    ///
    /// Invariant violations and errors that are already wrapped are returned unchanged.
    pub fn extraction<S: Into<String>>(message: S, cause: DocsiftError) -> Self {
        match cause {
            DocsiftError::InvariantViolation(_) | DocsiftError::Extraction { .. } => cause,
            other => DocsiftError::Extraction {
                message: message.into(),
                source: Box::new(other),
            },
        }
    }

    /// The error that caused an extraction failure, or `self` for any other kind.
    pub fn root_cause(&self) -> &DocsiftError {
        match self {
            DocsiftError::Extraction { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
