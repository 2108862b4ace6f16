//! Tool settings for `combine-configs`.
//!
//! Resolved in layers, later layers winning:
//! 1. Built-in defaults
//! 2. Settings file (TOML, `--settings`)
//! 3. CLI flags

use std::env;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Merge script shipped in every kernel tree.
pub const DEFAULT_MERGE_SCRIPT: &str = "scripts/kconfig/merge_config.sh";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to resolve configs root {path}: {source}")]
    CurrentDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Effective settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Root of the kernel configs repository.
    pub configs_root: PathBuf,

    /// Merge script path, relative to the kernel root, printed in the
    /// command hint.
    pub merge_script: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            configs_root: PathBuf::from("."),
            merge_script: DEFAULT_MERGE_SCRIPT.to_string(),
        }
    }
}

/// Settings file contents; every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    #[serde(default)]
    pub configs_root: Option<PathBuf>,

    #[serde(default)]
    pub merge_script: Option<String>,
}

impl SettingsFile {
    /// Load a settings file. Relative `configs_root` values are taken
    /// relative to the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut file = Self::from_str(&contents)?;
        if let (Some(root), Some(parent)) = (file.configs_root.as_mut(), path.parent()) {
            if root.is_relative() {
                *root = parent.join(&*root);
            }
        }
        Ok(file)
    }

    pub fn from_str(s: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(s)?)
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub configs_root: Option<PathBuf>,
}

impl ToolSettings {
    /// Build effective settings from defaults, an optional file and CLI
    /// overrides.
    pub fn resolve(
        settings_file: Option<&Path>,
        overrides: SettingsOverrides,
    ) -> Result<Self, SettingsError> {
        let mut settings = Self::default();

        if let Some(path) = settings_file {
            settings.apply_file(SettingsFile::from_file(path)?);
        }
        if let Some(root) = overrides.configs_root {
            settings.configs_root = root;
        }

        settings.validate()?;
        settings.configs_root = absolute_root(&settings.configs_root)?;
        Ok(settings)
    }

    fn apply_file(&mut self, file: SettingsFile) {
        if let Some(root) = file.configs_root {
            self.configs_root = root;
        }
        if let Some(script) = file.merge_script {
            self.merge_script = script;
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.configs_root.as_os_str().is_empty() {
            return Err(SettingsError::Validation(
                "configs_root cannot be empty".to_string(),
            ));
        }
        if self.merge_script.trim().is_empty() {
            return Err(SettingsError::Validation(
                "merge_script cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Anchor a relative root at the working directory, dropping `.` components.
fn absolute_root(root: &Path) -> Result<PathBuf, SettingsError> {
    let joined = if root.is_absolute() {
        root.to_path_buf()
    } else {
        let cwd = env::current_dir().map_err(|source| SettingsError::CurrentDir {
            path: root.to_path_buf(),
            source,
        })?;
        cwd.join(root)
    };
    Ok(joined
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect())
}
