/// Immutable trigger registry
///
/// Built once at startup from the config file and shared read-only across all
/// request tasks behind an `Arc`. Lookups never lock: nothing mutates the
/// registry after construction.

use crate::trigger::types::TriggerDefinition;
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Startup-time failure to load trigger definitions
///
/// Both variants are fatal: the server must not start without its triggers.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not readable: {path}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file not parseable (JSON format): {path}")]
    Unparseable {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// In-memory set of all configured triggers, in load order
#[derive(Debug, Default)]
pub struct TriggerRegistry {
    triggers: Vec<TriggerDefinition>,
}

impl TriggerRegistry {
    /// Build a registry from already loaded definitions
    ///
    /// Keeps the given order, since lookup resolves duplicate keys to the
    /// first definition.
    pub fn new(triggers: Vec<TriggerDefinition>) -> Self {
        let mut seen = HashSet::new();
        for trigger in &triggers {
            tracing::debug!(
                name = %trigger.name,
                url = %trigger.url,
                command = %trigger.command,
                "Trigger loaded"
            );
            if !seen.insert(trigger.url.as_str()) {
                tracing::warn!(
                    name = %trigger.name,
                    url = %trigger.url,
                    "⚠️ Duplicate trigger url, an earlier definition takes precedence"
                );
            }
        }

        tracing::info!(count = triggers.len(), "Triggers loaded");

        Self { triggers }
    }

    /// Load trigger definitions from a JSON config file
    ///
    /// The file holds a JSON array of `{name?, url, command}` objects.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let absolute_path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        tracing::info!(
            path = %path.display(),
            absolute_path = %absolute_path.display(),
            "📥 Loading triggers from config file..."
        );

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let triggers: Vec<TriggerDefinition> =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Unparseable {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self::new(triggers))
    }

    /// Find the trigger bound to a path key
    ///
    /// Compares byte-for-byte and returns the first match in load order.
    /// A miss is a normal outcome, not an error.
    pub fn lookup(&self, path: &str) -> Option<&TriggerDefinition> {
        self.triggers.iter().find(|trigger| trigger.url == path)
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TriggerDefinition> {
        self.triggers.iter()
    }
}
