//! Purser - SBOM generation through whichever tool fits best
//!
//! This crate provides the core library functionality for Purser: a
//! capability registry over external SBOM tools (cyclonedx-py,
//! cargo-cyclonedx, cdxgen, trivy, syft), fallback orchestration across
//! them, and validation of what they produce.

pub mod generator;
pub mod ops;
pub mod tools;
pub mod util;
pub mod validate;

/// Test utilities and mocks for Purser unit tests.
///
/// This module is only available when compiling tests. It provides mock
/// generators with call recording, preset tool caches, stub executables,
/// and SBOM fixtures.
#[cfg(test)]
pub mod test_support;

pub use generator::{
    default_registry, ecosystem_for, find_lock_file, FormatCapability, GenerateContext,
    GenerationRequest, GenerationResult, GeneratorRegistry, InputSource, SbomFormat,
    SbomGenerator,
};

pub use tools::{ExternalTool, ToolCache};
pub use validate::ValidationReport;
