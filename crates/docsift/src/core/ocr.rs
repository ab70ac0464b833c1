//! Instance-scoped OCR settings.
//!
//! OCR is enabled exactly when a configuration object is present. The object
//! is rebuilt on every mutation and snapshotted by value when an extraction
//! starts, so in-flight calls never observe later changes.

use crate::core::config::OcrConfig;
use parking_lot::RwLock;
use std::path::PathBuf;

#[derive(Debug)]
pub struct OcrSettings {
    state: RwLock<OcrState>,
}

#[derive(Debug, Clone)]
struct OcrState {
    /// Last configured backend path, language and arguments. Survives disabling.
    template: OcrConfig,
    /// Active configuration; `None` means OCR is off.
    active: Option<OcrConfig>,
}

impl OcrSettings {
    /// Settings starting from `initial` (enabled when `Some`).
    pub fn new(initial: Option<OcrConfig>) -> Self {
        let template = initial.clone().unwrap_or_default();
        Self {
            state: RwLock::new(OcrState {
                template,
                active: initial,
            }),
        }
    }

    /// Point OCR at `path` and enable it.
    pub fn set_backend_path(&self, path: impl Into<PathBuf>) {
        let mut state = self.state.write();
        state.template.backend_path = path.into();
        let active = state.template.clone();
        state.active = Some(active);
        tracing::debug!(backend = %state.template.backend_path.display(), "OCR backend path set");
    }

    /// Enable OCR with a fresh configuration built from the last-set path, or
    /// disable it by dropping the configuration entirely.
    pub fn set_enabled(&self, enabled: bool) {
        let mut state = self.state.write();
        let active = enabled.then(|| state.template.clone());
        state.active = active;
        tracing::debug!(enabled, "OCR toggled");
    }

    pub fn is_enabled(&self) -> bool {
        self.state.read().active.is_some()
    }

    /// Backend executable used when OCR is (or would be) enabled.
    pub fn backend_path(&self) -> PathBuf {
        self.state.read().template.backend_path.clone()
    }

    /// Copy of the active configuration, if OCR is enabled.
    pub fn snapshot(&self) -> Option<OcrConfig> {
        self.state.read().active.clone()
    }
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self::new(None)
    }
}
