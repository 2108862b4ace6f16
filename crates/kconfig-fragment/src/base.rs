//! Base config loader.
//!
//! Collects `CONFIG_*=value` assignments from defconfig-style files into a
//! single mapping. Files are scanned in priority order and later files
//! overwrite keys declared by earlier ones.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Prefix every recognized config key starts with.
pub const CONFIG_PREFIX: &str = "CONFIG_";

/// Errors raised while loading base config files.
#[derive(Debug, thiserror::Error)]
pub enum BaseConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Known config values, keyed by `CONFIG_*` name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseConfigSet {
    entries: BTreeMap<String, String>,
}

impl BaseConfigSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load assignments from `paths` in order.
    ///
    /// Paths that do not exist are skipped. A file that exists but cannot be
    /// read is an error.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self, BaseConfigError> {
        let mut set = Self::new();
        for path in paths {
            let path = path.as_ref();
            if !path.exists() {
                debug!(path = %path.display(), "skipping missing config file");
                continue;
            }

            let content = fs::read_to_string(path).map_err(|source| BaseConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let before = set.len();
            set.extend_from_str(&content);
            debug!(
                path = %path.display(),
                new_keys = set.len() - before,
                "loaded config file"
            );
        }
        Ok(set)
    }

    /// Parse a single defconfig-style text.
    pub fn parse_str(content: &str) -> Self {
        let mut set = Self::new();
        set.extend_from_str(content);
        set
    }

    /// Scan `content` and overwrite any keys it declares.
    pub fn extend_from_str(&mut self, content: &str) {
        for line in content.lines() {
            if let Some((key, value)) = parse_assignment(line) {
                self.entries.insert(key.to_string(), value.to_string());
            }
        }
    }

    /// Set a value explicitly, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Look up the value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|v| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for BaseConfigSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut set = Self::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

/// Split a defconfig line into key and value.
///
/// Only lines starting with `CONFIG_` and containing `=` are assignments.
/// The value is everything after the first `=`.
fn parse_assignment(line: &str) -> Option<(&str, &str)> {
    if !line.starts_with(CONFIG_PREFIX) {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    Some((key, value.trim()))
}
