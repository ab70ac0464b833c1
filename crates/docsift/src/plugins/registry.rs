//! Decoder registration and lookup.
//!
//! Each parsing backend owns its own [`DecoderRegistry`]; there is no
//! process-wide registry.

use crate::plugins::Decoder;
use crate::{DocsiftError, Result};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

fn validate_plugin_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DocsiftError::Validation {
            message: "Plugin name cannot be empty".to_string(),
            source: None,
        });
    }

    if name.contains(char::is_whitespace) {
        return Err(DocsiftError::Validation {
            message: format!("Plugin name '{}' cannot contain whitespace", name),
            source: None,
        });
    }

    Ok(())
}

fn lifecycle_error(plugin_name: &str, stage: &str, cause: DocsiftError) -> DocsiftError {
    DocsiftError::Plugin {
        message: format!("{} failed: {}", stage, cause),
        plugin_name: plugin_name.to_string(),
    }
}

/// Registry of decoders keyed by content type and priority.
#[derive(Default)]
pub struct DecoderRegistry {
    decoders: HashMap<String, BTreeMap<i32, Arc<dyn Decoder>>>,
    name_index: HashMap<String, Vec<(String, i32)>>,
}

impl DecoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decoder for every content type it supports.
    ///
    /// A decoder registered with the same content type and priority as an
    /// existing one replaces it.
    ///
    /// # Errors
    ///
    /// - `DocsiftError::Validation` if the name is empty or contains whitespace
    /// - `DocsiftError::Plugin` if the decoder's `initialize` fails
    pub fn register(&mut self, decoder: Arc<dyn Decoder>) -> Result<()> {
        let name = decoder.name().to_string();
        let priority = decoder.priority();
        let mime_types: Vec<String> = decoder
            .supported_mime_types()
            .iter()
            .map(|s| s.to_ascii_lowercase())
            .collect();

        validate_plugin_name(&name)?;

        decoder
            .initialize()
            .map_err(|e| lifecycle_error(&name, "initialize", e))?;

        let mut index_entries = Vec::new();

        for mime_type in &mime_types {
            self.decoders
                .entry(mime_type.clone())
                .or_default()
                .insert(priority, Arc::clone(&decoder));
            index_entries.push((mime_type.clone(), priority));
        }

        self.name_index.insert(name, index_entries);

        Ok(())
    }

    /// Best decoder for `mime_type`: exact matches first, then `type/*` patterns.
    pub fn find(&self, mime_type: &str) -> Option<Arc<dyn Decoder>> {
        if let Some(priority_map) = self.decoders.get(mime_type)
            && let Some((_priority, decoder)) = priority_map.iter().next_back()
        {
            return Some(Arc::clone(decoder));
        }

        let mut best_match: Option<(i32, Arc<dyn Decoder>)> = None;

        for (registered_mime, priority_map) in &self.decoders {
            let Some(prefix) = registered_mime.strip_suffix('*') else {
                continue;
            };
            if !prefix.ends_with('/') || !mime_type.starts_with(prefix) {
                continue;
            }
            if let Some((&priority, decoder)) = priority_map.iter().next_back() {
                let better = best_match.as_ref().is_none_or(|(current, _)| priority > *current);
                if better {
                    best_match = Some((priority, Arc::clone(decoder)));
                }
            }
        }

        best_match.map(|(_priority, decoder)| decoder)
    }

    /// Like [`find`](Self::find), failing with `UnsupportedFormat` when nothing matches.
    pub fn get(&self, mime_type: &str) -> Result<Arc<dyn Decoder>> {
        self.find(mime_type)
            .ok_or_else(|| DocsiftError::UnsupportedFormat(mime_type.to_string()))
    }

    /// Names of all registered decoders.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.name_index.keys().cloned().collect();
        names.sort();
        names
    }

    /// Remove a decoder by name and shut it down. Unknown names are ignored.
    ///
    /// The decoder is unregistered even when its `shutdown` fails; the failure
    /// is returned as `DocsiftError::Plugin`.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let index_entries = match self.name_index.remove(name) {
            Some(entries) => entries,
            None => return Ok(()),
        };

        let mut decoder_to_shutdown: Option<Arc<dyn Decoder>> = None;

        for (mime_type, priority) in index_entries {
            if let Some(priority_map) = self.decoders.get_mut(&mime_type) {
                if let Some(decoder) = priority_map.remove(&priority)
                    && decoder_to_shutdown.is_none()
                {
                    decoder_to_shutdown = Some(decoder);
                }

                if priority_map.is_empty() {
                    self.decoders.remove(&mime_type);
                }
            }
        }

        if let Some(decoder) = decoder_to_shutdown {
            decoder
                .shutdown()
                .map_err(|e| lifecycle_error(name, "shutdown", e))?;
        }

        Ok(())
    }

    pub fn shutdown_all(&mut self) -> Result<()> {
        let names: Vec<_> = self.name_index.keys().cloned().collect();
        for name in names {
            self.remove(&name)?;
        }
        Ok(())
    }
}
