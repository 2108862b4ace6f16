//! Conditional config generation for a platform defconfig.
//!
//! Steps:
//! - Locate the kernel tree from the defconfig path
//! - Read the kernel version from the kernel Makefile
//! - Find the matching directory in the configs repository
//! - Evaluate `android-base-conditional.xml` against the base configs
//! - Write `android-base-conditional.config`

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use kconfig_fragment::{
    generate_conditional_config, load_groups, BaseConfigError, BaseConfigSet, ConditionalOutput,
    GroupParseError, KernelVersion, VersionError,
};

use crate::layout::{AndroidVersion, ConfigsLayout, DefconfigLocation, LayoutError};

#[derive(Debug, Error)]
pub enum CombineError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("Failed to get the kernel version with the specified platform defconfig: {defconfig}")]
    KernelVersion {
        defconfig: PathBuf,
        #[source]
        source: VersionError,
    },

    #[error("android-base-conditional.xml was not found for kernel version: {kernel_version} ({path})")]
    ConditionalXmlNotFound {
        kernel_version: String,
        path: PathBuf,
    },

    #[error("Failed to parse the conditional file: {path}: {source}")]
    Groups {
        path: PathBuf,
        #[source]
        source: GroupParseError,
    },

    #[error(transparent)]
    BaseConfig(#[from] BaseConfigError),

    #[error("Failed to write conditional config: {0}")]
    Io(#[from] io::Error),
}

/// Where the resolved config goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Destination {
    /// `android-base-conditional.config` in the configs repository.
    #[default]
    Derived,
    File(PathBuf),
    /// Not written; returned to the caller.
    Stdout,
}

/// Inputs for one run.
#[derive(Debug, Clone)]
pub struct CombineRequest {
    pub defconfig: PathBuf,
    pub android_version: AndroidVersion,
    pub configs_root: PathBuf,
    pub destination: Destination,
}

/// Everything derived from the request before any file is written.
#[derive(Debug, Clone)]
pub struct CombinePlan {
    pub location: DefconfigLocation,
    pub kernel_version: KernelVersion,
    pub layout: ConfigsLayout,
}

impl CombinePlan {
    /// Check preconditions and derive paths.
    pub fn build(
        defconfig: &Path,
        android_version: AndroidVersion,
        configs_root: &Path,
    ) -> Result<Self, CombineError> {
        let location = DefconfigLocation::resolve(defconfig)?;
        debug!(
            kernel_root = %location.kernel_root.display(),
            arch = %location.arch,
            "located kernel tree"
        );

        let kernel_version = KernelVersion::detect(&location.kernel_root).map_err(|source| {
            CombineError::KernelVersion {
                defconfig: defconfig.to_path_buf(),
                source,
            }
        })?;
        debug!(kernel_version = %kernel_version, "detected kernel version");

        let layout = ConfigsLayout::new(
            configs_root,
            android_version,
            &kernel_version,
            &location.arch,
        );
        let conditional_xml = layout.conditional_xml();
        if !conditional_xml.exists() {
            return Err(CombineError::ConditionalXmlNotFound {
                kernel_version: kernel_version.major_minor(),
                path: conditional_xml,
            });
        }

        Ok(Self {
            location,
            kernel_version,
            layout,
        })
    }

    /// Base config values conditions are checked against.
    pub fn base_configs(&self) -> Result<BaseConfigSet, CombineError> {
        let mut base = BaseConfigSet::load(&self.layout.base_sources(&self.location.defconfig))?;
        base.insert(self.location.arch_config_key(), "y");
        Ok(base)
    }
}

/// Outcome of a run.
#[derive(Debug, Clone)]
pub struct CombineReport {
    pub plan: CombinePlan,
    pub output: ConditionalOutput,
}

/// Generate the conditional config for `request`.
pub fn run(request: &CombineRequest) -> Result<CombineReport, CombineError> {
    let plan = CombinePlan::build(
        &request.defconfig,
        request.android_version,
        &request.configs_root,
    )?;

    let conditional_xml = plan.layout.conditional_xml();
    let groups = load_groups(&conditional_xml).map_err(|source| CombineError::Groups {
        path: conditional_xml.clone(),
        source,
    })?;
    debug!(groups = groups.len(), "parsed conditional groups");

    let base = plan.base_configs()?;

    let dest = match &request.destination {
        Destination::Derived => Some(plan.layout.conditional_config()),
        Destination::File(path) => Some(path.clone()),
        Destination::Stdout => None,
    };
    let output = generate_conditional_config(&groups, &base, dest.as_deref())?;

    match &output {
        ConditionalOutput::NoGroups => {
            info!(path = %conditional_xml.display(), "no conditional groups defined")
        }
        ConditionalOutput::Written { path, resolved } => info!(
            path = %path.display(),
            entries = resolved.len(),
            "generated conditional config"
        ),
        ConditionalOutput::Rendered(resolved) => {
            debug!(entries = resolved.len(), "resolved conditional config")
        }
    }

    Ok(CombineReport { plan, output })
}
