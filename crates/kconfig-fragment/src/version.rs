//! Kernel version extraction from the top-level kernel Makefile.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const VERSION: &str = "VERSION";
pub const PATCHLEVEL: &str = "PATCHLEVEL";
pub const SUBLEVEL: &str = "SUBLEVEL";

/// Line prefixes recognized in the Makefile (exact literals).
const FIELD_PREFIXES: &[&str] = &["VERSION = ", "PATCHLEVEL = ", "SUBLEVEL = "];

#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    #[error("Failed to read kernel Makefile: {0}")]
    Io(#[from] io::Error),

    #[error("Kernel Makefile does not define {0}")]
    Missing(&'static str),
}

/// Read the version fields from `<kernel_root>/Makefile`.
///
/// A missing Makefile yields an empty mapping; callers decide which fields
/// they require.
pub fn read_version_fields(kernel_root: &Path) -> Result<BTreeMap<String, String>, VersionError> {
    let makefile = kernel_root.join("Makefile");
    if !makefile.exists() {
        tracing::debug!(path = %makefile.display(), "kernel Makefile not found");
        return Ok(BTreeMap::new());
    }
    let content = fs::read_to_string(&makefile)?;
    Ok(parse_version_fields(&content))
}

/// Extract `VERSION`, `PATCHLEVEL` and `SUBLEVEL` from Makefile text.
///
/// Stops scanning once all three are found.
pub fn parse_version_fields(content: &str) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();

    for line in content.lines() {
        if !FIELD_PREFIXES.iter().any(|p| line.starts_with(p)) {
            continue;
        }
        let mut parts = line.split('=');
        let key = parts.next().unwrap_or_default().trim();
        let value = parts.next().unwrap_or_default().trim();
        fields.insert(key.to_string(), value.to_string());

        if [VERSION, PATCHLEVEL, SUBLEVEL]
            .iter()
            .all(|k| fields.get(*k).is_some_and(|v: &String| !v.is_empty()))
        {
            break;
        }
    }

    fields
}

/// A kernel version with the fields the config tools need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelVersion {
    pub version: String,
    pub patchlevel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sublevel: Option<String>,
}

impl KernelVersion {
    /// Build from extracted fields; `VERSION` and `PATCHLEVEL` are required.
    pub fn from_fields(fields: &BTreeMap<String, String>) -> Result<Self, VersionError> {
        let version = fields.get(VERSION).ok_or(VersionError::Missing(VERSION))?;
        let patchlevel = fields
            .get(PATCHLEVEL)
            .ok_or(VersionError::Missing(PATCHLEVEL))?;
        Ok(Self {
            version: version.clone(),
            patchlevel: patchlevel.clone(),
            sublevel: fields.get(SUBLEVEL).cloned(),
        })
    }

    /// Read and validate the version of the kernel tree at `kernel_root`.
    pub fn detect(kernel_root: &Path) -> Result<Self, VersionError> {
        Self::from_fields(&read_version_fields(kernel_root)?)
    }

    /// `major.minor`, as used in configs repo directory names.
    pub fn major_minor(&self) -> String {
        format!("{}.{}", self.version, self.patchlevel)
    }
}

impl fmt::Display for KernelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sublevel {
            Some(sub) => write!(f, "{}.{}.{}", self.version, self.patchlevel, sub),
            None => write!(f, "{}.{}", self.version, self.patchlevel),
        }
    }
}
