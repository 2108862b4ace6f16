//! Suggested `merge_config.sh` invocation for the final kernel config.

use std::path::{Path, PathBuf};

use crate::layout::{ConfigsLayout, DefconfigLocation};

/// A ready-to-run merge command for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCommand {
    pub kernel_root: PathBuf,
    /// Lowercase architecture passed as `ARCH=`.
    pub arch: String,
    pub merge_script: String,
    /// Existing config files, in merge order.
    pub files: Vec<PathBuf>,
}

impl MergeCommand {
    /// Collect the merge inputs that exist on disk.
    pub fn new(location: &DefconfigLocation, layout: &ConfigsLayout, merge_script: &str) -> Self {
        let files = layout
            .merge_sources(&location.defconfig)
            .into_iter()
            .filter(|p| p.exists())
            .collect();
        Self {
            kernel_root: location.kernel_root.clone(),
            arch: location.arch.to_lowercase(),
            merge_script: merge_script.to_string(),
            files,
        }
    }

    /// `ARCH=<arch> <script> <files...>`
    pub fn command_line(&self) -> String {
        let mut line = format!("ARCH={} {}", self.arch, self.merge_script);
        for file in &self.files {
            line.push(' ');
            line.push_str(&display_path(file));
        }
        line
    }

    /// The full hint printed to the user.
    pub fn render(&self) -> String {
        format!(
            "Please go to the kernel tree and run commands like following\n\
             to generate the combined configs:\n    cd {}\n    {}\n",
            self.kernel_root.display(),
            self.command_line()
        )
    }
}

fn display_path(path: &Path) -> String {
    path.display().to_string().replace("/./", "/")
}
