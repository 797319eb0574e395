//! Structural validation of generated SBOM documents.
//!
//! Validation is deliberately soft: every function here returns a report
//! rather than an error, and a report has three states. `Skipped` means we
//! have no rules for that format/version pair and is not a failure - old
//! CycloneDX revisions exist in the wild and refusing to emit them would
//! be worse than emitting them unchecked.
//!
//! The checks are structural (required fields, declared format and version
//! matching the request), not full JSON Schema evaluation. They catch the
//! realistic failure mode: a tool that exited zero but wrote a truncated
//! or mislabeled document.

use std::path::Path;

use serde_json::Value;

use crate::generator::capability::SbomFormat;

/// CycloneDX versions with validation rules. Older revisions are skipped.
const CHECKED_CYCLONEDX_VERSIONS: &[&str] = &["1.3", "1.4", "1.5", "1.6", "1.7"];

/// SPDX versions with validation rules.
const CHECKED_SPDX_VERSIONS: &[&str] = &["2.2", "2.3"];

/// Three-state validation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    /// Document satisfied every check.
    Passed,
    /// Document violated at least one check.
    Failed,
    /// No rules exist for this format/version; nothing was checked.
    Skipped,
}

/// Result of validating one document.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    status: ValidationStatus,
    messages: Vec<String>,
}

impl ValidationReport {
    /// A report for a document that passed every check.
    pub fn passed() -> Self {
        ValidationReport {
            status: ValidationStatus::Passed,
            messages: Vec::new(),
        }
    }

    /// A report carrying one or more violations.
    pub fn failed(messages: Vec<String>) -> Self {
        ValidationReport {
            status: ValidationStatus::Failed,
            messages,
        }
    }

    /// A report for a document nothing could be checked against.
    pub fn skipped(reason: impl Into<String>) -> Self {
        ValidationReport {
            status: ValidationStatus::Skipped,
            messages: vec![reason.into()],
        }
    }

    /// The outcome state.
    pub fn status(&self) -> ValidationStatus {
        self.status
    }

    /// True when the document passed.
    pub fn is_passed(&self) -> bool {
        self.status == ValidationStatus::Passed
    }

    /// True when the document failed.
    pub fn is_failed(&self) -> bool {
        self.status == ValidationStatus::Failed
    }

    /// True when validation was skipped.
    pub fn is_skipped(&self) -> bool {
        self.status == ValidationStatus::Skipped
    }

    /// Violations, or the skip reason.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// One-line rendering for status output.
    pub fn summary(&self) -> String {
        match self.status {
            ValidationStatus::Passed => "passed".to_string(),
            ValidationStatus::Failed => match self.messages.first() {
                Some(first) => format!("failed: {}", first),
                None => "failed".to_string(),
            },
            ValidationStatus::Skipped => match self.messages.first() {
                Some(reason) => format!("skipped: {}", reason),
                None => "skipped".to_string(),
            },
        }
    }
}

/// Format and version a document declares about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedFormat {
    /// Declared format
    pub format: SbomFormat,
    /// Declared spec version, when the document names one
    pub spec_version: Option<String>,
}

/// Detect the format and version of a parsed SBOM document.
pub fn detect_format(doc: &Value) -> Option<DetectedFormat> {
    if doc.get("bomFormat").and_then(Value::as_str) == Some("CycloneDX") {
        let spec_version = doc
            .get("specVersion")
            .and_then(Value::as_str)
            .map(str::to_string);
        return Some(DetectedFormat {
            format: SbomFormat::CycloneDx,
            spec_version,
        });
    }

    if let Some(spdx_version) = doc.get("spdxVersion").and_then(Value::as_str) {
        let spec_version = spdx_version.strip_prefix("SPDX-").map(str::to_string);
        return Some(DetectedFormat {
            format: SbomFormat::Spdx,
            spec_version,
        });
    }

    None
}

/// Validate a parsed document against an expected format and version.
pub fn validate_document(doc: &Value, format: SbomFormat, spec_version: &str) -> ValidationReport {
    match format {
        SbomFormat::CycloneDx => {
            if !CHECKED_CYCLONEDX_VERSIONS.contains(&spec_version) {
                return ValidationReport::skipped(format!(
                    "no validation rules for cyclonedx {}",
                    spec_version
                ));
            }
            validate_cyclonedx(doc, spec_version)
        }
        SbomFormat::Spdx => {
            if !CHECKED_SPDX_VERSIONS.contains(&spec_version) {
                return ValidationReport::skipped(format!(
                    "no validation rules for spdx {}",
                    spec_version
                ));
            }
            validate_spdx(doc, spec_version)
        }
    }
}

/// Validate an SBOM file against an expected format and version.
pub fn validate_file(path: &Path, format: SbomFormat, spec_version: &str) -> ValidationReport {
    let doc = match read_document(path) {
        Ok(doc) => doc,
        Err(report) => return *report,
    };
    validate_document(&doc, format, spec_version)
}

/// Validate an SBOM file, detecting format and version from its content.
pub fn validate_file_auto(path: &Path) -> (Option<DetectedFormat>, ValidationReport) {
    let doc = match read_document(path) {
        Ok(doc) => doc,
        Err(report) => return (None, *report),
    };

    let Some(detected) = detect_format(&doc) else {
        return (
            None,
            ValidationReport::failed(vec![
                "could not detect SBOM format (not CycloneDX or SPDX)".to_string(),
            ]),
        );
    };

    let Some(spec_version) = detected.spec_version.clone() else {
        let report = ValidationReport::failed(vec![format!(
            "could not detect {} spec version",
            detected.format
        )]);
        return (Some(detected), report);
    };

    let report = validate_document(&doc, detected.format, &spec_version);
    (Some(detected), report)
}

fn read_document(path: &Path) -> Result<Value, Box<ValidationReport>> {
    if !path.exists() {
        return Err(Box::new(ValidationReport::failed(vec![format!(
            "file not found: {}",
            path.display()
        )])));
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            return Err(Box::new(ValidationReport::failed(vec![format!(
                "failed to read {}: {}",
                path.display(),
                e
            )])))
        }
    };

    match serde_json::from_str(&contents) {
        Ok(doc) => Ok(doc),
        Err(e) => Err(Box::new(ValidationReport::failed(vec![format!(
            "invalid JSON: {}",
            e
        )]))),
    }
}

fn validate_cyclonedx(doc: &Value, spec_version: &str) -> ValidationReport {
    let mut violations = Vec::new();

    let Some(root) = doc.as_object() else {
        return ValidationReport::failed(vec!["document root is not an object".to_string()]);
    };

    match root.get("bomFormat").and_then(Value::as_str) {
        Some("CycloneDX") => {}
        Some(other) => violations.push(format!(
            "bomFormat is \"{}\", expected \"CycloneDX\"",
            other
        )),
        None => violations.push("missing required field: bomFormat".to_string()),
    }

    match root.get("specVersion").and_then(Value::as_str) {
        Some(declared) if declared == spec_version => {}
        Some(declared) => violations.push(format!(
            "specVersion is \"{}\", expected \"{}\"",
            declared, spec_version
        )),
        None => violations.push("missing required field: specVersion".to_string()),
    }

    if let Some(components) = root.get("components") {
        match components.as_array() {
            Some(entries) => {
                for (index, entry) in entries.iter().enumerate() {
                    let Some(component) = entry.as_object() else {
                        violations.push(format!("components[{}] is not an object", index));
                        continue;
                    };
                    if component.get("type").and_then(Value::as_str).is_none() {
                        violations.push(format!("components[{}] missing \"type\"", index));
                    }
                    if component.get("name").and_then(Value::as_str).is_none() {
                        violations.push(format!("components[{}] missing \"name\"", index));
                    }
                }
            }
            None => violations.push("\"components\" is not an array".to_string()),
        }
    }

    if violations.is_empty() {
        ValidationReport::passed()
    } else {
        ValidationReport::failed(violations)
    }
}

fn validate_spdx(doc: &Value, spec_version: &str) -> ValidationReport {
    let mut violations = Vec::new();

    let Some(root) = doc.as_object() else {
        return ValidationReport::failed(vec!["document root is not an object".to_string()]);
    };

    let expected_version = format!("SPDX-{}", spec_version);
    match root.get("spdxVersion").and_then(Value::as_str) {
        Some(declared) if declared == expected_version => {}
        Some(declared) => violations.push(format!(
            "spdxVersion is \"{}\", expected \"{}\"",
            declared, expected_version
        )),
        None => violations.push("missing required field: spdxVersion".to_string()),
    }

    match root.get("SPDXID").and_then(Value::as_str) {
        Some("SPDXRef-DOCUMENT") => {}
        Some(other) => violations.push(format!(
            "SPDXID is \"{}\", expected \"SPDXRef-DOCUMENT\"",
            other
        )),
        None => violations.push("missing required field: SPDXID".to_string()),
    }

    if root.get("name").and_then(Value::as_str).is_none() {
        violations.push("missing required field: name".to_string());
    }

    match root.get("dataLicense").and_then(Value::as_str) {
        Some("CC0-1.0") => {}
        Some(other) => {
            violations.push(format!("dataLicense is \"{}\", expected \"CC0-1.0\"", other))
        }
        None => violations.push("missing required field: dataLicense".to_string()),
    }

    if !root
        .get("creationInfo")
        .map_or(false, |info| info.is_object())
    {
        violations.push("missing required object: creationInfo".to_string());
    }

    if let Some(packages) = root.get("packages") {
        if !packages.is_array() {
            violations.push("\"packages\" is not an array".to_string());
        }
    }

    if violations.is_empty() {
        ValidationReport::passed()
    } else {
        ValidationReport::failed(violations)
    }
}
