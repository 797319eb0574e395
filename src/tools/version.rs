//! Tool version detection.
//!
//! The five external tools disagree on `--version` output shape ("Version:
//! 0.68.2", "syft 1.38.2", a bare "12.0.0"), so detection just lifts the
//! first `major.minor.patch` token out of whatever the tool prints.

use std::path::Path;
use std::sync::OnceLock;

use anyhow::{bail, Result};
use regex::Regex;

use crate::util::process::ProcessBuilder;

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+\.\d+\.\d+").expect("static version pattern is valid"))
}

/// Run `tool --version` and extract the reported version.
///
/// Some tools print their version to stderr, so both streams are searched.
pub fn detect_tool_version(command: &Path) -> Result<semver::Version> {
    let output = ProcessBuilder::new(command).arg("--version").exec()?;

    if !output.status.success() {
        bail!("{} --version failed", command.display());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let combined = format!("{}\n{}", stdout, stderr);

    extract_version(&combined).ok_or_else(|| {
        anyhow::anyhow!(
            "could not parse version from {} --version output",
            command.display()
        )
    })
}

/// Find the first `major.minor.patch` token in free-form output.
pub fn extract_version(output: &str) -> Option<semver::Version> {
    let token = version_pattern().find(output)?.as_str();
    semver::Version::parse(token).ok()
}
