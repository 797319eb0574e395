//! CLI integration tests for Purser.
//!
//! These tests verify the full CLI surface without requiring any real
//! SBOM tool: PATH is pointed at an empty or stub-filled directory, so
//! every run is hermetic.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the purser binary command.
fn purser() -> Command {
    Command::cargo_bin("purser").unwrap()
}

/// Create a temporary directory for test projects.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// A purser command with PATH pointed at `bin_dir` and HOME at `home`.
///
/// Keeps the host's installed tools and any real ~/.purser out of the
/// test's view.
fn purser_hermetic(bin_dir: &Path, home: &Path) -> Command {
    let mut cmd = purser();
    cmd.env("PATH", bin_dir).env("HOME", home);
    cmd
}

/// Write an executable stub tool into `dir` and return its path.
#[cfg(unix)]
fn stub_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

const VALID_CYCLONEDX: &str =
    r#"{"bomFormat": "CycloneDX", "specVersion": "1.6", "components": []}"#;

// ============================================================================
// purser (top level)
// ============================================================================

#[test]
fn test_help_lists_subcommands() {
    purser()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("generators"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("doctor"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_no_args_shows_usage() {
    purser()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

// ============================================================================
// purser generate
// ============================================================================

#[test]
fn test_generate_fails_without_lock_file() {
    let tmp = temp_dir();
    let bin = temp_dir();

    purser_hermetic(bin.path(), tmp.path())
        .arg("generate")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no recognized lock file found"));
}

#[test]
fn test_generate_fails_when_no_tool_is_installed() {
    let tmp = temp_dir();
    let bin = temp_dir();
    fs::write(tmp.path().join("requirements.txt"), "requests==2.31.0\n").unwrap();

    purser_hermetic(bin.path(), tmp.path())
        .arg("generate")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("SBOM generation failed"))
        .stderr(predicate::str::contains("No SBOM generators available"))
        .stderr(predicate::str::contains("purser doctor"));
}

#[test]
fn test_generate_rejects_lock_and_image() {
    let tmp = temp_dir();
    let bin = temp_dir();
    fs::write(tmp.path().join("Cargo.lock"), "version = 3\n").unwrap();

    purser_hermetic(bin.path(), tmp.path())
        .args(["generate", "Cargo.lock", "--image", "alpine:3.20"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be combined"));
}

#[test]
fn test_generate_rejects_missing_input_path() {
    let tmp = temp_dir();
    let bin = temp_dir();

    purser_hermetic(bin.path(), tmp.path())
        .args(["generate", "absent.lock"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("input path not found"));
}

#[cfg(unix)]
#[test]
fn test_generate_succeeds_with_stub_trivy() {
    let tmp = temp_dir();
    let bin = temp_dir();
    fs::write(tmp.path().join("uv.lock"), "[[package]]\nname = \"requests\"\n").unwrap();
    stub_tool(bin.path(), "trivy", &format!("echo '{}'", VALID_CYCLONEDX));

    purser_hermetic(bin.path(), tmp.path())
        .arg("generate")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Generated"))
        .stderr(predicate::str::contains("trivy-fs"))
        .stderr(predicate::str::contains("Validated"));

    let output = fs::read_to_string(tmp.path().join("sbom.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(doc["bomFormat"], "CycloneDX");
}

#[cfg(unix)]
#[test]
fn test_generate_warns_but_succeeds_when_validation_fails() {
    let tmp = temp_dir();
    let bin = temp_dir();
    fs::write(tmp.path().join("uv.lock"), "[[package]]\nname = \"requests\"\n").unwrap();
    // Declares 1.4 while the tool is invoked for 1.6, so the document
    // fails validation without failing generation.
    stub_tool(
        bin.path(),
        "trivy",
        r#"echo '{"bomFormat": "CycloneDX", "specVersion": "1.4", "components": []}'"#,
    );

    purser_hermetic(bin.path(), tmp.path())
        .arg("generate")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Generated"))
        .stderr(predicate::str::contains("failed validation"))
        .stderr(predicate::str::contains(r#"specVersion is "1.4""#));
}

#[cfg(unix)]
#[test]
fn test_generate_quiet_suppresses_status() {
    let tmp = temp_dir();
    let bin = temp_dir();
    fs::write(tmp.path().join("uv.lock"), "[[package]]\n").unwrap();
    stub_tool(bin.path(), "trivy", &format!("echo '{}'", VALID_CYCLONEDX));

    purser_hermetic(bin.path(), tmp.path())
        .args(["--quiet", "generate"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Generated").not());

    assert!(tmp.path().join("sbom.json").exists());
}

#[cfg(unix)]
#[test]
fn test_generate_json_mode_emits_event() {
    let tmp = temp_dir();
    let bin = temp_dir();
    fs::write(tmp.path().join("uv.lock"), "[[package]]\n").unwrap();
    stub_tool(bin.path(), "trivy", &format!("echo '{}'", VALID_CYCLONEDX));

    let assert = purser_hermetic(bin.path(), tmp.path())
        .args(["--json", "generate"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"reason\":\"generate-finished\""));

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let event: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(event["success"], true);
    assert_eq!(event["generator"], "trivy-fs");
    assert_eq!(event["format"], "cyclonedx");
}

#[cfg(unix)]
#[test]
fn test_generate_unsupported_version_has_no_candidates() {
    let tmp = temp_dir();
    let bin = temp_dir();
    fs::write(tmp.path().join("uv.lock"), "[[package]]\n").unwrap();
    stub_tool(bin.path(), "trivy", &format!("echo '{}'", VALID_CYCLONEDX));

    purser_hermetic(bin.path(), tmp.path())
        .args(["generate", "-s", "9.9"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No generator found for input"))
        .stderr(predicate::str::contains("version=9.9"));
}

#[cfg(unix)]
#[test]
fn test_generate_explicit_output_path() {
    let tmp = temp_dir();
    let bin = temp_dir();
    fs::write(tmp.path().join("uv.lock"), "[[package]]\n").unwrap();
    stub_tool(bin.path(), "trivy", &format!("echo '{}'", VALID_CYCLONEDX));

    purser_hermetic(bin.path(), tmp.path())
        .args(["generate", "-o", "out/deps.cdx.json"])
        .current_dir(tmp.path())
        .assert()
        .success();

    assert!(tmp.path().join("out/deps.cdx.json").exists());
}

// ============================================================================
// purser validate
// ============================================================================

#[test]
fn test_validate_passes_on_valid_document() {
    let tmp = temp_dir();
    let file = tmp.path().join("bom.json");
    fs::write(&file, VALID_CYCLONEDX).unwrap();

    purser()
        .args(["validate", "bom.json"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Validated"))
        .stderr(predicate::str::contains("cyclonedx 1.6"));
}

#[test]
fn test_validate_fails_on_unrecognized_document() {
    let tmp = temp_dir();
    let file = tmp.path().join("bom.json");
    fs::write(&file, r#"{"not": "an sbom"}"#).unwrap();

    purser()
        .args(["validate", "bom.json"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not detect SBOM format"))
        .stderr(predicate::str::contains("failed validation"));
}

#[test]
fn test_validate_fails_on_missing_file() {
    let tmp = temp_dir();

    purser()
        .args(["validate", "absent.json"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn test_validate_reports_format_mismatch() {
    let tmp = temp_dir();
    let file = tmp.path().join("bom.json");
    fs::write(&file, VALID_CYCLONEDX).unwrap();

    purser()
        .args(["validate", "bom.json", "-f", "spdx"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "expected spdx but the document declares cyclonedx",
        ));
}

#[test]
fn test_validate_with_explicit_format_and_version() {
    let tmp = temp_dir();
    let file = tmp.path().join("bom.json");
    fs::write(&file, VALID_CYCLONEDX).unwrap();

    purser()
        .args(["validate", "bom.json", "-f", "cyclonedx", "-s", "1.6"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Validated"));

    // A version mismatch against the declared one must fail.
    purser()
        .args(["validate", "bom.json", "-f", "cyclonedx", "-s", "1.5"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed validation"));
}

// ============================================================================
// purser generators
// ============================================================================

#[test]
fn test_generators_list_names_every_generator() {
    let tmp = temp_dir();
    let bin = temp_dir();

    let assert = purser_hermetic(bin.path(), tmp.path())
        .args(["generators", "list"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    for name in [
        "cyclonedx-py",
        "cargo-cyclonedx",
        "cdxgen-fs",
        "cdxgen-image",
        "trivy-fs",
        "trivy-image",
        "syft-fs",
        "syft-image",
    ] {
        assert!(stdout.contains(name), "missing generator {} in:\n{}", name, stdout);
    }
    assert!(stdout.contains("missing"));
}

#[test]
fn test_generators_bare_defaults_to_list() {
    let tmp = temp_dir();
    let bin = temp_dir();

    purser_hermetic(bin.path(), tmp.path())
        .arg("generators")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("trivy-fs"));
}

#[test]
fn test_generators_show_includes_install_hint_when_missing() {
    let tmp = temp_dir();
    let bin = temp_dir();

    purser_hermetic(bin.path(), tmp.path())
        .args(["generators", "show", "trivy-fs"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Trivy"))
        .stdout(predicate::str::contains("Installed: no"))
        .stdout(predicate::str::contains("brew install trivy"));
}

#[test]
fn test_generators_show_unknown_name_fails() {
    let tmp = temp_dir();
    let bin = temp_dir();

    purser_hermetic(bin.path(), tmp.path())
        .args(["generators", "show", "nonexistent"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no generator named"));
}

#[test]
fn test_generators_check_reports_missing_tools() {
    let tmp = temp_dir();
    let bin = temp_dir();

    purser_hermetic(bin.path(), tmp.path())
        .args(["generators", "check"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("cyclonedx-py"))
        .stdout(predicate::str::contains("not installed"));
}

#[cfg(unix)]
#[test]
fn test_generators_check_reports_version() {
    let tmp = temp_dir();
    let bin = temp_dir();
    stub_tool(bin.path(), "syft", "echo 'syft 1.38.2'");

    purser_hermetic(bin.path(), tmp.path())
        .args(["generators", "check"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1.38.2"));
}

// ============================================================================
// purser doctor
// ============================================================================

#[test]
fn test_doctor_fails_with_no_tools() {
    let tmp = temp_dir();
    let bin = temp_dir();

    purser_hermetic(bin.path(), tmp.path())
        .arg("doctor")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Purser Doctor"))
        .stdout(predicate::str::contains("[!!] Generation tools"))
        .stdout(predicate::str::contains("SBOM generation will not work"));
}

#[cfg(unix)]
#[test]
fn test_doctor_passes_with_one_tool() {
    let tmp = temp_dir();
    let bin = temp_dir();
    stub_tool(bin.path(), "syft", "echo 'syft 1.38.2'");

    purser_hermetic(bin.path(), tmp.path())
        .arg("doctor")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] Syft (optional)"))
        .stdout(predicate::str::contains("[OK] Generation tools"));
}

#[cfg(unix)]
#[test]
fn test_doctor_verbose_shows_versions() {
    let tmp = temp_dir();
    let bin = temp_dir();
    stub_tool(bin.path(), "syft", "echo 'syft 1.38.2'");

    purser_hermetic(bin.path(), tmp.path())
        .args(["--verbose", "doctor"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Version: 1.38.2"));
}

// ============================================================================
// purser init
// ============================================================================

#[test]
fn test_init_writes_starter_config() {
    let tmp = temp_dir();
    let bin = temp_dir();

    purser_hermetic(bin.path(), tmp.path())
        .arg("init")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Created"));

    let config = fs::read_to_string(tmp.path().join(".purser/config.toml")).unwrap();
    assert!(config.contains("[generate]"));
    assert!(config.contains("[tools]"));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let tmp = temp_dir();
    let bin = temp_dir();

    purser_hermetic(bin.path(), tmp.path())
        .arg("init")
        .current_dir(tmp.path())
        .assert()
        .success();

    purser_hermetic(bin.path(), tmp.path())
        .arg("init")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    purser_hermetic(bin.path(), tmp.path())
        .args(["init", "--force"])
        .current_dir(tmp.path())
        .assert()
        .success();
}

#[test]
fn test_init_config_round_trips_through_generate() {
    let tmp = temp_dir();
    let bin = temp_dir();

    purser_hermetic(bin.path(), tmp.path())
        .arg("init")
        .current_dir(tmp.path())
        .assert()
        .success();

    // The starter config is all comments, so generation behaves exactly
    // as if no config existed.
    fs::write(tmp.path().join("requirements.txt"), "requests\n").unwrap();
    purser_hermetic(bin.path(), tmp.path())
        .arg("generate")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No SBOM generators available"));
}

// ============================================================================
// purser completions
// ============================================================================

#[test]
fn test_completions_bash() {
    purser()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("purser"));
}
