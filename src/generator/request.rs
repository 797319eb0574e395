//! Generation request types.
//!
//! A request describes exactly one unit of work: produce an SBOM in one
//! format, from one input, into one output file. The input is either a
//! dependency lock file or a container image - never both, never neither.
//! That rule is enforced at construction so the rest of the pipeline can
//! match on [`InputSource`] without re-checking.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::generator::capability::SbomFormat;

/// The subject an SBOM is generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A dependency lock file on the local filesystem.
    LockFile(PathBuf),
    /// A container image reference (e.g. `alpine:3.20`).
    Image(String),
}

/// Error returned when request inputs are inconsistent.
#[derive(Debug, Clone, Error)]
pub enum RequestError {
    /// Both a lock file and an image were given.
    #[error("a lock file and an image reference cannot be combined; pass exactly one")]
    BothInputs,

    /// Neither a lock file nor an image was given.
    #[error("no input to scan; pass a lock file path or an image reference")]
    NoInput,
}

/// A single SBOM generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    source: InputSource,
    format: SbomFormat,
    spec_version: Option<String>,
    output_path: PathBuf,
    validate: bool,
}

impl GenerationRequest {
    /// Create a request that scans a lock file.
    pub fn for_lock_file(
        lock_file: impl Into<PathBuf>,
        format: SbomFormat,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        GenerationRequest {
            source: InputSource::LockFile(lock_file.into()),
            format,
            spec_version: None,
            output_path: output_path.into(),
            validate: true,
        }
    }

    /// Create a request that scans a container image.
    pub fn for_image(
        image: impl Into<String>,
        format: SbomFormat,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        GenerationRequest {
            source: InputSource::Image(image.into()),
            format,
            spec_version: None,
            output_path: output_path.into(),
            validate: true,
        }
    }

    /// Build a request from optional CLI-style inputs.
    ///
    /// Exactly one of `lock_file` and `image` must be present.
    pub fn from_options(
        lock_file: Option<PathBuf>,
        image: Option<String>,
        format: SbomFormat,
        output_path: impl Into<PathBuf>,
    ) -> Result<Self, RequestError> {
        let source = match (lock_file, image) {
            (Some(_), Some(_)) => return Err(RequestError::BothInputs),
            (None, None) => return Err(RequestError::NoInput),
            (Some(path), None) => InputSource::LockFile(path),
            (None, Some(reference)) => InputSource::Image(reference),
        };

        Ok(GenerationRequest {
            source,
            format,
            spec_version: None,
            output_path: output_path.into(),
            validate: true,
        })
    }

    /// Set the requested spec version.
    ///
    /// `None` lets each generator fall back to its own default.
    pub fn with_spec_version(mut self, spec_version: Option<String>) -> Self {
        self.spec_version = spec_version;
        self
    }

    /// Enable or disable post-generation validation.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// The requested output format.
    pub fn format(&self) -> SbomFormat {
        self.format
    }

    /// The requested spec version, if any.
    pub fn spec_version(&self) -> Option<&str> {
        self.spec_version.as_deref()
    }

    /// Where the generated document must be written.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Whether the generated document should be validated.
    pub fn validate(&self) -> bool {
        self.validate
    }

    /// True when the input is a lock file.
    pub fn is_lock_input(&self) -> bool {
        matches!(self.source, InputSource::LockFile(_))
    }

    /// True when the input is a container image.
    pub fn is_image_input(&self) -> bool {
        matches!(self.source, InputSource::Image(_))
    }

    /// The lock file path, if this is a lock file request.
    pub fn lock_file(&self) -> Option<&Path> {
        match &self.source {
            InputSource::LockFile(path) => Some(path),
            InputSource::Image(_) => None,
        }
    }

    /// The bare lock file name, if this is a lock file request.
    pub fn lock_file_name(&self) -> Option<&str> {
        self.lock_file().and_then(|p| p.file_name()).and_then(|n| n.to_str())
    }

    /// The image reference, if this is an image request.
    pub fn image(&self) -> Option<&str> {
        match &self.source {
            InputSource::LockFile(_) => None,
            InputSource::Image(reference) => Some(reference),
        }
    }

    /// A short display name for the input, for status lines and logs.
    pub fn input_name(&self) -> String {
        match &self.source {
            InputSource::LockFile(path) => path.display().to_string(),
            InputSource::Image(reference) => reference.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_file_request() {
        let request = GenerationRequest::for_lock_file(
            "project/requirements.txt",
            SbomFormat::CycloneDx,
            "bom.json",
        );

        assert!(request.is_lock_input());
        assert!(!request.is_image_input());
        assert_eq!(request.lock_file_name(), Some("requirements.txt"));
        assert_eq!(request.image(), None);
        assert_eq!(request.format(), SbomFormat::CycloneDx);
        assert_eq!(request.spec_version(), None);
        assert!(request.validate());
    }

    #[test]
    fn test_image_request() {
        let request =
            GenerationRequest::for_image("alpine:3.20", SbomFormat::Spdx, "sbom.spdx.json");

        assert!(request.is_image_input());
        assert_eq!(request.image(), Some("alpine:3.20"));
        assert_eq!(request.lock_file(), None);
        assert_eq!(request.input_name(), "alpine:3.20");
    }

    #[test]
    fn test_from_options_rejects_both() {
        let err = GenerationRequest::from_options(
            Some(PathBuf::from("Cargo.lock")),
            Some("alpine:3.20".to_string()),
            SbomFormat::CycloneDx,
            "bom.json",
        )
        .unwrap_err();
        assert!(matches!(err, RequestError::BothInputs));
    }

    #[test]
    fn test_from_options_rejects_neither() {
        let err =
            GenerationRequest::from_options(None, None, SbomFormat::CycloneDx, "bom.json")
                .unwrap_err();
        assert!(matches!(err, RequestError::NoInput));
    }

    #[test]
    fn test_from_options_picks_source() {
        let request = GenerationRequest::from_options(
            Some(PathBuf::from("Cargo.lock")),
            None,
            SbomFormat::CycloneDx,
            "bom.json",
        )
        .unwrap();
        assert!(request.is_lock_input());

        let request = GenerationRequest::from_options(
            None,
            Some("debian:12".to_string()),
            SbomFormat::CycloneDx,
            "bom.json",
        )
        .unwrap();
        assert!(request.is_image_input());
    }

    #[test]
    fn test_builders() {
        let request = GenerationRequest::for_lock_file(
            "Cargo.lock",
            SbomFormat::CycloneDx,
            "bom.json",
        )
        .with_spec_version(Some("1.5".to_string()))
        .with_validation(false);

        assert_eq!(request.spec_version(), Some("1.5"));
        assert!(!request.validate());
    }
}
