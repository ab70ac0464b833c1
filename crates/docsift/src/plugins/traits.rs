//! Base plugin trait definition.
//!
//! Every decoder implements [`Plugin`], which carries identity and lifecycle
//! hooks. The registry calls `initialize` on registration and `shutdown` on
//! removal.

use crate::Result;

/// Base trait for all docsift plugins.
///
/// Plugins are shared as `Arc<dyn Trait>` across threads, so they must be
/// `Send + Sync` and any mutable state needs interior mutability.
pub trait Plugin: Send + Sync {
    /// Unique, whitespace-free identifier (e.g. `"pdf-decoder"`).
    ///
    /// Recorded under `X-Parsed-By` whenever the plugin decodes a document.
    fn name(&self) -> &str;

    /// Semantic version of this plugin.
    fn version(&self) -> String;

    /// Called once when the plugin is registered.
    ///
    /// # Errors
    ///
    /// The plugin is not registered if this returns an error.
    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    /// Called when the plugin is removed from its registry.
    fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    fn description(&self) -> &str {
        ""
    }

    fn author(&self) -> &str {
        ""
    }
}
