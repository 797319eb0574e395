//! SBOM generation - capability registry, tool adapters, and fallback.
//!
//! A [`GenerationRequest`] names one input (lock file or container
//! image), one output format, and optionally a pinned spec version. The
//! [`GeneratorRegistry`] matches it against the registered adapters'
//! declared capabilities and tries them in priority order until one
//! produces a document. Native single-ecosystem tools sit at the front
//! of that order, generic multi-ecosystem scanners behind them.

pub mod adapters;
pub mod capability;
pub mod ecosystem;
pub mod registry;
pub mod request;
pub mod result;
pub mod trait_def;

pub use capability::{FormatCapability, SbomFormat, CYCLONEDX_VERSIONS, SPDX_VERSIONS};
pub use ecosystem::{ecosystem_for, find_lock_file, is_known_lock_file, Ecosystem};
pub use registry::{GeneratorRegistry, GeneratorSummary};
pub use request::{GenerationRequest, InputSource, RequestError};
pub use result::GenerationResult;
pub use trait_def::{GenerateContext, SbomGenerator, DEFAULT_TIMEOUT};

use std::sync::Arc;

use crate::tools::ToolCache;

use adapters::{
    CargoCycloneDxGenerator, CdxgenFsGenerator, CdxgenImageGenerator, CycloneDxPyGenerator,
    SyftFsGenerator, SyftImageGenerator, TrivyFsGenerator, TrivyImageGenerator,
};

/// Build the registry with every known adapter.
///
/// Registration order is the tie-break within a priority tier, so the
/// filesystem variant of each tool goes in before its image variant.
pub fn default_registry(cache: Arc<ToolCache>) -> GeneratorRegistry {
    let mut registry = GeneratorRegistry::new(Arc::clone(&cache));

    registry.register(Box::new(CycloneDxPyGenerator::new(Arc::clone(&cache))));
    registry.register(Box::new(CargoCycloneDxGenerator::new(Arc::clone(&cache))));
    registry.register(Box::new(CdxgenFsGenerator::new(Arc::clone(&cache))));
    registry.register(Box::new(CdxgenImageGenerator::new(Arc::clone(&cache))));
    registry.register(Box::new(TrivyFsGenerator::new(Arc::clone(&cache))));
    registry.register(Box::new(TrivyImageGenerator::new(Arc::clone(&cache))));
    registry.register(Box::new(SyftFsGenerator::new(Arc::clone(&cache))));
    registry.register(Box::new(SyftImageGenerator::new(cache)));

    registry
}
