//! Path conventions of the kernel tree and the kernel configs repository.
//!
//! A platform defconfig lives at `<kernel_root>/arch/<arch>/configs/<name>`.
//! The configs repository keeps one directory per Android release and kernel
//! version: `<configs_root>/<release>/android-<major>.<minor>/`, where the
//! master release uses `<configs_root>` itself.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;


use kconfig_fragment::{KernelVersion, CONFIG_PREFIX};

/// Supported values of the target Android version selector.
pub const SUPPORTED_ANDROID_VERSIONS: &[&str] = &[".", "o", "o-mr1", "p"];

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("The aversion specified is not supported: {0}")]
    UnsupportedAndroidVersion(String),

    #[error("The specified platform defconfig file does not exist: {0}")]
    DefconfigNotFound(PathBuf),

    #[error("Platform defconfig is not under <kernel>/arch/<arch>/configs/: {0}")]
    UnexpectedDefconfigPath(PathBuf),

    #[error("Failed to resolve platform defconfig {path}: {source}")]
    Resolve {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Target Android release of the configs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AndroidVersion {
    /// Current development branch, stored at the configs root.
    #[default]
    Master,
    O,
    OMr1,
    P,
}

impl AndroidVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            AndroidVersion::Master => ".",
            AndroidVersion::O => "o",
            AndroidVersion::OMr1 => "o-mr1",
            AndroidVersion::P => "p",
        }
    }

    /// Directory under the configs root, if any.
    fn subdir(&self) -> Option<&'static str> {
        match self {
            AndroidVersion::Master => None,
            other => Some(other.as_str()),
        }
    }
}

impl FromStr for AndroidVersion {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "." => Ok(AndroidVersion::Master),
            "o" => Ok(AndroidVersion::O),
            "o-mr1" => Ok(AndroidVersion::OMr1),
            "p" => Ok(AndroidVersion::P),
            other => Err(LayoutError::UnsupportedAndroidVersion(other.to_string())),
        }
    }
}

impl fmt::Display for AndroidVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A platform defconfig and what its location says about the kernel tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefconfigLocation {
    /// Canonical path of the defconfig.
    pub defconfig: PathBuf,
    /// Root of the kernel source tree.
    pub kernel_root: PathBuf,
    /// Architecture directory name, as found in the path (e.g. `arm64`).
    pub arch: String,
}

impl DefconfigLocation {
    /// Locate an existing defconfig on disk.
    pub fn resolve(path: &Path) -> Result<Self, LayoutError> {
        if !path.exists() {
            return Err(LayoutError::DefconfigNotFound(path.to_path_buf()));
        }
        let canonical = path.canonicalize().map_err(|source| LayoutError::Resolve {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_canonical(canonical)
    }

    /// Derive kernel root and arch from an absolute defconfig path.
    pub fn from_canonical(defconfig: PathBuf) -> Result<Self, LayoutError> {
        let unexpected = || LayoutError::UnexpectedDefconfigPath(defconfig.clone());

        let kernel_root = defconfig.ancestors().nth(4).ok_or_else(unexpected)?;
        let arch = defconfig
            .ancestors()
            .nth(2)
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .ok_or_else(unexpected)?;

        Ok(Self {
            kernel_root: kernel_root.to_path_buf(),
            arch: arch.to_string(),
            defconfig: defconfig.clone(),
        })
    }

    /// The `CONFIG_<ARCH>` key implied by the defconfig location.
    ///
    /// Defconfigs never set it explicitly, so it is added as `y` before
    /// conditions are evaluated.
    pub fn arch_config_key(&self) -> String {
        format!("{}{}", CONFIG_PREFIX, self.arch.to_uppercase())
    }
}

/// Files of one release/kernel-version directory in the configs repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigsLayout {
    dir: PathBuf,
    arch: String,
}

impl ConfigsLayout {
    pub fn new(
        configs_root: &Path,
        android_version: AndroidVersion,
        kernel_version: &KernelVersion,
        arch: &str,
    ) -> Self {
        let mut dir = configs_root.to_path_buf();
        if let Some(sub) = android_version.subdir() {
            dir.push(sub);
        }
        dir.push(format!("android-{}", kernel_version.major_minor()));
        Self {
            dir,
            arch: arch.to_lowercase(),
        }
    }

    /// The release/kernel-version directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn base_config(&self) -> PathBuf {
        self.dir.join("android-base.config")
    }

    pub fn base_config_arch(&self) -> PathBuf {
        self.dir.join(format!("android-base-{}.config", self.arch))
    }

    /// Generated output of the conditional resolution.
    pub fn conditional_config(&self) -> PathBuf {
        self.dir.join("android-base-conditional.config")
    }

    pub fn recommended_config(&self) -> PathBuf {
        self.dir.join("android-recommended.config")
    }

    pub fn recommended_config_arch(&self) -> PathBuf {
        self.dir.join(format!("android-recommended-{}.config", self.arch))
    }

    pub fn conditional_xml(&self) -> PathBuf {
        self.dir.join("android-base-conditional.xml")
    }

    /// Files whose values conditions are evaluated against, lowest priority
    /// first.
    ///
    /// Recommended configs are deliberately left out.
    pub fn base_sources(&self, defconfig: &Path) -> Vec<PathBuf> {
        vec![
            defconfig.to_path_buf(),
            self.base_config(),
            self.base_config_arch(),
        ]
    }

    /// Every file that may take part in the final kernel config merge, in
    /// merge order.
    pub fn merge_sources(&self, defconfig: &Path) -> Vec<PathBuf> {
        vec![
            defconfig.to_path_buf(),
            self.base_config(),
            self.base_config_arch(),
            self.conditional_config(),
            self.recommended_config(),
            self.recommended_config_arch(),
        ]
    }
}
