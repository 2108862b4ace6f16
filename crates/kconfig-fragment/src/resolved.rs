//! Resolved conditional config output.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Final `CONFIG_*` assignments produced by the matched groups.
///
/// Entries are kept sorted by key so rendering is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedConfig {
    entries: BTreeMap<String, String>,
}

impl ResolvedConfig {
    pub(crate) fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|v| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `KEY=VALUE` lines in key order, each newline-terminated.
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}={}\n", k, v))
            .collect()
    }

    /// The full config fragment text.
    pub fn render(&self) -> String {
        self.lines().concat()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// What `generate_conditional_config` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionalOutput {
    /// No groups were defined; nothing was produced.
    NoGroups,

    /// The resolved fragment was written to `path`.
    Written {
        path: PathBuf,
        resolved: ResolvedConfig,
    },

    /// No destination was given; the resolved fragment is returned as-is.
    Rendered(ResolvedConfig),
}

impl ConditionalOutput {
    /// The resolved config, if anything was produced.
    pub fn resolved(&self) -> Option<&ResolvedConfig> {
        match self {
            ConditionalOutput::NoGroups => None,
            ConditionalOutput::Written { resolved, .. } => Some(resolved),
            ConditionalOutput::Rendered(resolved) => Some(resolved),
        }
    }
}
