//! End-to-end tests for the `combine-configs` binary.

mod common;

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use common::{Workspace, CONDITIONAL_XML};
use predicates::prelude::*;

fn combine(ws: &Workspace) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_combine-configs"));
    cmd.arg("--configs-root").arg(ws.configs_path());
    cmd
}

#[test]
fn test_generates_conditional_config() {
    let ws = Workspace::new();
    ws.write_configs("android-4.19/android-base-conditional.xml", CONDITIONAL_XML);
    ws.write_configs("android-4.19/android-base.config", "CONFIG_COMPAT=y\n");

    combine(&ws)
        .arg("--defconfig")
        .arg(ws.defconfig())
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote:"));

    let generated =
        fs::read_to_string(ws.configs_path().join("android-4.19/android-base-conditional.config"))
            .unwrap();
    assert_eq!(
        generated,
        "CONFIG_ARMV8_DEPRECATED=y\nCONFIG_CP15_BARRIER_EMULATION=n\n"
    );
}

#[test]
fn test_aversion_selects_release_directory() {
    let ws = Workspace::new();
    ws.write_configs("p/android-4.19/android-base-conditional.xml", CONDITIONAL_XML);

    combine(&ws)
        .args(["--aversion", "p", "--defconfig"])
        .arg(ws.defconfig())
        .assert()
        .success();

    let generated = fs::read_to_string(
        ws.configs_path()
            .join("p/android-4.19/android-base-conditional.config"),
    )
    .unwrap();
    assert_eq!(
        generated,
        "CONFIG_ARMV8_DEPRECATED=y\nCONFIG_CP15_BARRIER_EMULATION=y\n"
    );
}

#[test]
fn test_stdout_does_not_write() {
    let ws = Workspace::new();
    ws.write_configs("android-4.19/android-base-conditional.xml", CONDITIONAL_XML);

    combine(&ws)
        .arg("--stdout")
        .arg("--defconfig")
        .arg(ws.defconfig())
        .assert()
        .success()
        .stdout("CONFIG_ARMV8_DEPRECATED=y\nCONFIG_CP15_BARRIER_EMULATION=y\n");

    assert!(!ws
        .configs_path()
        .join("android-4.19/android-base-conditional.config")
        .exists());
}

#[test]
fn test_stdout_json() {
    let ws = Workspace::new();
    ws.write_configs("android-4.19/android-base-conditional.xml", CONDITIONAL_XML);

    let output = combine(&ws)
        .args(["--stdout", "--json", "--defconfig"])
        .arg(ws.defconfig())
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["CONFIG_ARMV8_DEPRECATED"], "y");
}

#[test]
fn test_print_commands_lists_existing_files() {
    let ws = Workspace::new();
    ws.write_configs("android-4.19/android-base-conditional.xml", CONDITIONAL_XML);
    ws.write_configs("android-4.19/android-base.config", "CONFIG_AUDIT=y\n");
    ws.write_configs("android-4.19/android-recommended.config", "CONFIG_ZRAM=y\n");

    let output = combine(&ws)
        .args(["--print-commands", "--defconfig"])
        .arg(ws.defconfig())
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert!(stdout.contains("Please go to the kernel tree"));
    assert!(stdout.contains("ARCH=arm64 scripts/kconfig/merge_config.sh"));
    let command = stdout
        .lines()
        .find(|l| l.trim_start().starts_with("ARCH="))
        .unwrap();
    let files: Vec<&str> = command.split_whitespace().skip(2).collect();
    assert_eq!(files.len(), 4);
    assert!(files[0].ends_with("hikey_defconfig"));
    assert!(files[1].ends_with("android-base.config"));
    assert!(files[2].ends_with("android-base-conditional.config"));
    assert!(files[3].ends_with("android-recommended.config"));
}

#[test]
fn test_settings_file_merge_script() {
    let ws = Workspace::new();
    ws.write_configs("android-4.19/android-base-conditional.xml", CONDITIONAL_XML);
    let settings = ws.write_configs(
        "combine.toml",
        "configs_root = \".\"\nmerge_script = \"tools/merge.sh\"\n",
    );

    Command::new(env!("CARGO_BIN_EXE_combine-configs"))
        .arg("--settings")
        .arg(&settings)
        .args(["--print-commands", "--defconfig"])
        .arg(ws.defconfig())
        .assert()
        .success()
        .stdout(predicate::str::contains("ARCH=arm64 tools/merge.sh"));
}

#[test]
fn test_unsupported_aversion() {
    let ws = Workspace::new();
    combine(&ws)
        .args(["--aversion", "q", "--defconfig"])
        .arg(ws.defconfig())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("The aversion specified is not supported: q"));
}

#[test]
fn test_missing_defconfig() {
    let ws = Workspace::new();
    combine(&ws)
        .arg("--defconfig")
        .arg(ws.kernel.path().join("arch/arm64/configs/nope_defconfig"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_missing_kernel_version() {
    let ws = Workspace::new();
    ws.write_kernel("Makefile", "VERSION = 4\n");
    combine(&ws)
        .arg("--defconfig")
        .arg(ws.defconfig())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to get the kernel version"))
        .stderr(predicate::str::contains("Please check and try again"));
}

#[test]
fn test_missing_conditional_xml() {
    let ws = Workspace::new();
    combine(&ws)
        .arg("--defconfig")
        .arg(ws.defconfig())
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "android-base-conditional.xml was not found for kernel version: 4.19",
        ));
}

#[test]
fn test_malformed_conditional_xml() {
    let ws = Workspace::new();
    ws.write_configs(
        "android-4.19/android-base-conditional.xml",
        "<group><conditions></group>",
    );
    combine(&ws)
        .arg("--defconfig")
        .arg(ws.defconfig())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse the conditional file"));
    assert!(!ws
        .configs_path()
        .join("android-4.19/android-base-conditional.config")
        .exists());
}

#[test]
fn test_print_commands_paths_absolute_with_default_root() {
    let ws = Workspace::new();
    ws.write_configs("android-4.19/android-base-conditional.xml", CONDITIONAL_XML);
    ws.write_configs("android-4.19/android-base.config", "CONFIG_AUDIT=y\n");

    let output = Command::new(env!("CARGO_BIN_EXE_combine-configs"))
        .current_dir(ws.configs_path())
        .args(["--print-commands", "--defconfig"])
        .arg(ws.defconfig())
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    let command = stdout
        .lines()
        .find(|l| l.trim_start().starts_with("ARCH="))
        .unwrap();
    let files: Vec<&str> = command.split_whitespace().skip(2).collect();
    assert_eq!(files.len(), 3);
    for file in files {
        assert!(Path::new(file).is_absolute(), "relative path in hint: {}", file);
        assert!(!file.contains("/./"));
    }
    assert!(ws
        .configs_path()
        .join("android-4.19/android-base-conditional.config")
        .exists());
}

#[test]
fn test_rust_log_enables_debug_events() {
    let ws = Workspace::new();
    ws.write_configs("android-4.19/android-base-conditional.xml", CONDITIONAL_XML);

    combine(&ws)
        .env("RUST_LOG", "debug")
        .arg("--defconfig")
        .arg(ws.defconfig())
        .assert()
        .success()
        .stderr(predicate::str::contains("located kernel tree"));
}

#[test]
fn test_default_log_level_hides_debug_events() {
    let ws = Workspace::new();
    ws.write_configs("android-4.19/android-base-conditional.xml", CONDITIONAL_XML);

    combine(&ws)
        .env_remove("RUST_LOG")
        .arg("--defconfig")
        .arg(ws.defconfig())
        .assert()
        .success()
        .stderr(predicate::str::contains("located kernel tree").not());
}
