//! Named configuration value lookup.
//!
//! Values are resolved with a fixed precedence: the host-supplied
//! properties map first, then a process environment variable under the
//! primary key, then one under the normalised key (dots replaced by
//! underscores). The pipeline never writes configuration; sourcing beyond
//! this lookup order is the host's concern.

use std::collections::HashMap;
use std::env;

/// Replaces the separators that shells reject in variable names.
#[must_use]
pub fn normalise_key(key: &str) -> String {
    key.replace('.', "_")
}

/// A read-only view of process-level configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    properties: HashMap<String, String>,
}

impl ConfigSource {
    /// Creates a source with no host-supplied properties.
    ///
    /// Lookups still consult the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source over a host-supplied properties map.
    #[must_use]
    pub fn from_properties(properties: HashMap<String, String>) -> Self {
        Self { properties }
    }

    /// Sets a property, shadowing any environment value for its key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Resolves a named value.
    ///
    /// Precedence: property under the primary key, then the environment
    /// variable of the same name, then the environment variable under the
    /// normalised key. Returns `None` when all three are absent.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<String> {
        if let Some(value) = self.properties.get(key) {
            return Some(value.clone());
        }
        if let Ok(value) = env::var(key) {
            return Some(value);
        }
        env::var(normalise_key(key)).ok()
    }
}
