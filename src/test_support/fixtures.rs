//! Test fixtures for SBOM documents and lock-file projects.
//!
//! SBOM templates here satisfy the structural validator for their
//! declared format and version; the broken variants each violate one
//! specific check so tests can assert on the violation they care about.

use std::path::PathBuf;

use tempfile::TempDir;

/// SBOM document templates.
pub mod sboms {
    /// A minimal CycloneDX document declaring the given spec version.
    pub fn cyclonedx(spec_version: &str) -> String {
        format!(
            r#"{{
  "bomFormat": "CycloneDX",
  "specVersion": "{spec_version}",
  "version": 1,
  "components": [
    {{
      "type": "library",
      "name": "requests",
      "version": "2.31.0",
      "purl": "pkg:pypi/requests@2.31.0"
    }},
    {{
      "type": "library",
      "name": "flask",
      "version": "3.0.0",
      "purl": "pkg:pypi/flask@3.0.0"
    }}
  ]
}}
"#
        )
    }

    /// A CycloneDX document with no components key at all.
    pub fn cyclonedx_without_components(spec_version: &str) -> String {
        format!(
            r#"{{
  "bomFormat": "CycloneDX",
  "specVersion": "{spec_version}",
  "version": 1
}}
"#
        )
    }

    /// A CycloneDX document with a malformed components entry.
    pub fn cyclonedx_bad_component(spec_version: &str) -> String {
        format!(
            r#"{{
  "bomFormat": "CycloneDX",
  "specVersion": "{spec_version}",
  "version": 1,
  "components": [
    {{
      "version": "1.0.0"
    }}
  ]
}}
"#
        )
    }

    /// A minimal SPDX document declaring the given spec version.
    pub fn spdx(spec_version: &str) -> String {
        format!(
            r#"{{
  "spdxVersion": "SPDX-{spec_version}",
  "SPDXID": "SPDXRef-DOCUMENT",
  "name": "test-artifact",
  "dataLicense": "CC0-1.0",
  "documentNamespace": "https://example.invalid/spdx/test-artifact",
  "creationInfo": {{
    "created": "2024-01-01T00:00:00Z",
    "creators": ["Tool: test"]
  }},
  "packages": [
    {{
      "SPDXID": "SPDXRef-Package-requests",
      "name": "requests",
      "versionInfo": "2.31.0",
      "downloadLocation": "NOASSERTION"
    }}
  ]
}}
"#
        )
    }

    /// Valid JSON that is recognizably neither CycloneDX nor SPDX.
    pub fn not_an_sbom() -> &'static str {
        r#"{"kind": "inventory", "items": []}"#
    }

    /// Bytes that do not parse as JSON.
    pub fn truncated() -> &'static str {
        r#"{"bomFormat": "CycloneDX", "specVersion": "1.6", "compo"#
    }
}

/// Starter config file contents.
pub mod configs {
    /// A config pinning every `[generate]` knob.
    pub fn full() -> &'static str {
        r#"[generate]
format = "cyclonedx"
spec_version = "1.5"
output = "artifacts/bom.json"
timeout_secs = 120
validate = false

[tools]
trivy = "/opt/trivy/bin/trivy"
"#
    }

    /// A config that only sets the output format.
    pub fn minimal() -> &'static str {
        r#"[generate]
format = "spdx"
"#
    }
}

/// Plausible content for a named lock file.
pub fn lock_file_content(file_name: &str) -> String {
    match file_name {
        "requirements.txt" => "requests==2.31.0\nflask==3.0.0\n".to_string(),
        "Cargo.lock" => r#"# This file is automatically @generated by Cargo.
# It is not intended for manual editing.
version = 3

[[package]]
name = "serde"
version = "1.0.200"
"#
        .to_string(),
        "package-lock.json" => r#"{
  "name": "test-app",
  "version": "1.0.0",
  "lockfileVersion": 3,
  "packages": {}
}
"#
        .to_string(),
        "go.mod" => "module example.invalid/test-app\n\ngo 1.22\n".to_string(),
        "Gemfile.lock" => "GEM\n  specs:\n    rack (3.0.0)\n".to_string(),
        "pubspec.lock" => "packages:\n  http:\n    version: \"1.2.0\"\n".to_string(),
        _ => format!("# test fixture for {}\n", file_name),
    }
}

/// Create a temp project holding one lock file, returning its path too.
///
/// The TempDir handle keeps the directory alive; dropping it cleans up.
pub fn lock_file_project(lock_name: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let lock_path = tmp.path().join(lock_name);
    std::fs::write(&lock_path, lock_file_content(lock_name)).expect("failed to write lock file");
    (tmp, lock_path)
}

/// Write an SBOM fixture into a directory, returning the file path.
pub fn write_sbom(dir: &std::path::Path, file_name: &str, content: &str) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, content).expect("failed to write SBOM fixture");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cyclonedx_fixture_is_valid_json() {
        let doc: serde_json::Value = serde_json::from_str(&sboms::cyclonedx("1.6")).unwrap();
        assert_eq!(doc["bomFormat"], "CycloneDX");
        assert_eq!(doc["specVersion"], "1.6");
        assert!(doc["components"].is_array());
    }

    #[test]
    fn test_spdx_fixture_is_valid_json() {
        let doc: serde_json::Value = serde_json::from_str(&sboms::spdx("2.3")).unwrap();
        assert_eq!(doc["spdxVersion"], "SPDX-2.3");
        assert_eq!(doc["SPDXID"], "SPDXRef-DOCUMENT");
    }

    #[test]
    fn test_truncated_fixture_does_not_parse() {
        assert!(serde_json::from_str::<serde_json::Value>(sboms::truncated()).is_err());
    }

    #[test]
    fn test_lock_file_project() {
        let (tmp, lock_path) = lock_file_project("requirements.txt");

        assert!(lock_path.exists());
        assert_eq!(lock_path.parent().unwrap(), tmp.path());
        let content = std::fs::read_to_string(&lock_path).unwrap();
        assert!(content.contains("requests=="));
    }

    #[test]
    fn test_write_sbom() {
        let tmp = TempDir::new().unwrap();
        let path = write_sbom(tmp.path(), "bom.json", &sboms::cyclonedx("1.5"));

        assert!(path.exists());
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"specVersion\": \"1.5\""));
    }
}
