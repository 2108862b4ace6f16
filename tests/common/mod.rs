//! Throwaway kernel trees and configs repositories for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const MAKEFILE_4_19: &str = "\
# SPDX-License-Identifier: GPL-2.0
VERSION = 4
PATCHLEVEL = 19
SUBLEVEL = 50
EXTRAVERSION =
NAME = \"People's Front\"
";

pub const CONDITIONAL_XML: &str = r#"<kernel minlts="4.19.0" />
<group>
    <conditions>
        <config>
            <key>CONFIG_ARM64</key>
            <value type="bool">y</value>
        </config>
    </conditions>
    <config>
        <key>CONFIG_ARMV8_DEPRECATED</key>
        <value type="bool">y</value>
    </config>
    <config>
        <key>CONFIG_CP15_BARRIER_EMULATION</key>
        <value type="bool">y</value>
    </config>
</group>
<group>
    <conditions>
        <config>
            <key>CONFIG_X86</key>
            <value type="bool">y</value>
        </config>
    </conditions>
    <config>
        <key>CONFIG_PAGE_TABLE_ISOLATION</key>
        <value type="bool">y</value>
    </config>
</group>
<group>
    <conditions>
        <config>
            <key>CONFIG_ARM64</key>
            <value type="bool">y</value>
        </config>
        <config>
            <key>CONFIG_COMPAT</key>
            <value type="bool">y</value>
        </config>
    </conditions>
    <config>
        <key>CONFIG_CP15_BARRIER_EMULATION</key>
        <value type="bool">n</value>
    </config>
</group>
"#;

/// A kernel tree and a configs repository in temporary directories.
pub struct Workspace {
    pub kernel: TempDir,
    pub configs: TempDir,
}

impl Workspace {
    /// Kernel 4.19 tree with an arm64 `hikey_defconfig`.
    pub fn new() -> Self {
        let ws = Self {
            kernel: TempDir::new().unwrap(),
            configs: TempDir::new().unwrap(),
        };
        ws.write_kernel("Makefile", MAKEFILE_4_19);
        ws.write_kernel("arch/arm64/configs/hikey_defconfig", "CONFIG_PCI=y\n");
        ws
    }

    pub fn write_kernel(&self, rel: &str, content: &str) -> PathBuf {
        write(&self.kernel.path().join(rel), content)
    }

    /// Write a file under `<configs>/<rel>`.
    pub fn write_configs(&self, rel: &str, content: &str) -> PathBuf {
        write(&self.configs.path().join(rel), content)
    }

    pub fn defconfig(&self) -> PathBuf {
        self.kernel.path().join("arch/arm64/configs/hikey_defconfig")
    }

    pub fn configs_path(&self) -> &Path {
        self.configs.path()
    }
}

fn write(path: &Path, content: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
    path.to_path_buf()
}
