//! Generation result type.
//!
//! Results are only built through the [`GenerationResult::success`] and
//! [`GenerationResult::failure`] factories, which keeps the core invariant
//! by construction: a successful result always carries an output path and
//! never an error message, and a failed result the reverse. Validation is
//! attached after the fact and can never flip that success flag.

use std::path::{Path, PathBuf};

use crate::generator::capability::SbomFormat;
use crate::validate::ValidationReport;

/// Outcome of one generation attempt.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    success: bool,
    output_path: Option<PathBuf>,
    error: Option<String>,
    generator_name: String,
    format: SbomFormat,
    spec_version: String,
    validation: Option<ValidationReport>,
}

impl GenerationResult {
    /// Build a successful result pointing at the produced document.
    pub fn success(
        generator_name: impl Into<String>,
        format: SbomFormat,
        spec_version: impl Into<String>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        GenerationResult {
            success: true,
            output_path: Some(output_path.into()),
            error: None,
            generator_name: generator_name.into(),
            format,
            spec_version: spec_version.into(),
            validation: None,
        }
    }

    /// Build a failed result carrying the reason.
    pub fn failure(
        generator_name: impl Into<String>,
        format: SbomFormat,
        spec_version: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        GenerationResult {
            success: false,
            output_path: None,
            error: Some(error.into()),
            generator_name: generator_name.into(),
            format,
            spec_version: spec_version.into(),
            validation: None,
        }
    }

    /// Attach a validation report, returning a new result.
    ///
    /// The success flag is carried over untouched; a failed validation is
    /// recorded, not promoted into a generation failure.
    pub fn with_validation(mut self, report: ValidationReport) -> Self {
        self.validation = Some(report);
        self
    }

    /// Whether generation produced a document.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Path of the produced document, present exactly when successful.
    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    /// Failure reason, present exactly when not successful.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Name of the generator that produced this result.
    ///
    /// `"none"` when every candidate failed and the registry synthesized
    /// an aggregate failure.
    pub fn generator_name(&self) -> &str {
        &self.generator_name
    }

    /// Format of the (attempted) document.
    pub fn format(&self) -> SbomFormat {
        self.format
    }

    /// Spec version actually used, or `"default"` when generation never
    /// got far enough to resolve one.
    pub fn spec_version(&self) -> &str {
        &self.spec_version
    }

    /// Validation report, if validation ran.
    pub fn validation(&self) -> Option<&ValidationReport> {
        self.validation.as_ref()
    }
}
