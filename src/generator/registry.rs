//! Generator registry - candidate selection and fallback orchestration.
//!
//! Key principle: registration never fails and never probes anything.
//! Candidate filtering consults only declared capabilities and the shared
//! tool cache; external processes are spawned exclusively inside
//! `generate`, and only for generators that already passed the filter.
//!
//! The registry never returns an `Err` for an unproducible SBOM. Every
//! way a request can fail - no candidates, every candidate failing, a
//! candidate panicking - is folded into a failure `GenerationResult`
//! whose error text tells the user what to do next.

use std::collections::{BTreeMap, BTreeSet};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::generator::capability::{FormatCapability, SbomFormat};
use crate::generator::request::GenerationRequest;
use crate::generator::result::GenerationResult;
use crate::generator::trait_def::{GenerateContext, SbomGenerator};
use crate::tools::catalog;
use crate::tools::{ExternalTool, ToolCache};
use crate::validate;

/// Registry of SBOM generators, tried in priority order.
pub struct GeneratorRegistry {
    generators: Vec<Box<dyn SbomGenerator>>,
    cache: Arc<ToolCache>,
}

impl GeneratorRegistry {
    /// Create an empty registry sharing the given availability cache.
    pub fn new(cache: Arc<ToolCache>) -> Self {
        GeneratorRegistry {
            generators: Vec::new(),
            cache,
        }
    }

    /// Register a generator. Registration order breaks priority ties.
    pub fn register(&mut self, generator: Box<dyn SbomGenerator>) {
        tracing::debug!(
            "Registered generator: {} (priority={})",
            generator.name(),
            generator.priority()
        );
        self.generators.push(generator);
    }

    /// The availability cache this registry consults.
    pub fn tool_cache(&self) -> &ToolCache {
        &self.cache
    }

    /// Number of registered generators.
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Look up a generator by name.
    pub fn find(&self, name: &str) -> Option<&dyn SbomGenerator> {
        self.generators
            .iter()
            .map(|g| g.as_ref())
            .find(|g| g.name() == name)
    }

    /// All generators applicable to a request, sorted by ascending priority.
    ///
    /// A generator qualifies when its `supports` predicate holds, it
    /// declares the requested format, and - if the request pins a spec
    /// version - that version is in the declared set. The sort is stable,
    /// so equal priorities keep their registration order.
    pub fn candidates_for(&self, request: &GenerationRequest) -> Vec<&dyn SbomGenerator> {
        let mut applicable = Vec::new();

        for generator in &self.generators {
            let generator = generator.as_ref();

            if !generator.supports(request) {
                continue;
            }
            if generator.capability_for(request.format()).is_none() {
                continue;
            }
            if let Some(version) = request.spec_version() {
                if !generator.supports_format(request.format(), Some(version)) {
                    tracing::debug!(
                        "Generator {} does not support {} {}",
                        generator.name(),
                        request.format(),
                        version
                    );
                    continue;
                }
            }

            applicable.push(generator);
        }

        applicable.sort_by_key(|g| g.priority());
        applicable
    }

    /// Generate an SBOM using the first candidate that succeeds.
    ///
    /// Candidates run strictly in order. A failure result or a panic from
    /// one candidate is recorded and the next is tried; the first success
    /// stops the loop and - when the request asks for it - gets a
    /// validation report attached. Validation can annotate a success but
    /// never downgrade it.
    pub fn generate(&self, request: &GenerationRequest, ctx: &GenerateContext) -> GenerationResult {
        let candidates = self.candidates_for(request);

        if candidates.is_empty() {
            return self.no_candidate_failure(request);
        }

        let mut last_error: Option<String> = None;

        for generator in candidates {
            tracing::info!("Trying generator: {}", generator.name());

            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| generator.generate(request, ctx)));

            match outcome {
                Ok(Ok(result)) if result.is_success() => {
                    tracing::info!("Generated SBOM with {}", generator.name());
                    if request.validate() {
                        return self.validate_result(result);
                    }
                    return result;
                }
                Ok(Ok(result)) => {
                    let reason = result.error().unwrap_or("unknown error").to_string();
                    tracing::warn!("Generator {} failed: {}", generator.name(), reason);
                    last_error = Some(reason);
                }
                Ok(Err(err)) => {
                    tracing::warn!("Generator {} errored: {:#}", generator.name(), err);
                    last_error = Some(format!("{:#}", err));
                }
                Err(payload) => {
                    let detail = panic_detail(payload.as_ref());
                    tracing::warn!("Generator {} panicked: {}", generator.name(), detail);
                    last_error = Some(format!("{} panicked: {}", generator.name(), detail));
                }
            }
        }

        self.all_failed_failure(request, last_error)
    }

    /// Summaries of every generator, sorted like candidates.
    pub fn list_all(&self) -> Vec<GeneratorSummary> {
        let mut summaries: Vec<GeneratorSummary> = self
            .generators
            .iter()
            .map(|g| GeneratorSummary::from_generator(g.as_ref(), &self.cache))
            .collect();
        summaries.sort_by_key(|s| s.priority);
        summaries
    }

    /// Union of formats and versions advertised across all generators.
    pub fn available_formats(&self) -> BTreeMap<SbomFormat, Vec<String>> {
        let mut formats: BTreeMap<SbomFormat, BTreeSet<String>> = BTreeMap::new();

        for generator in &self.generators {
            for capability in generator.capabilities() {
                formats
                    .entry(capability.format())
                    .or_default()
                    .extend(capability.versions().iter().cloned());
            }
        }

        formats
            .into_iter()
            .map(|(format, versions)| (format, versions.into_iter().collect()))
            .collect()
    }

    /// Failure for a request no registered generator can serve.
    ///
    /// Two distinct diagnoses: every tool relevant to this input is
    /// missing (install guidance), or tools exist but none advertise the
    /// requested format/version (list what is actually on offer).
    fn no_candidate_failure(&self, request: &GenerationRequest) -> GenerationResult {
        let requested_version = request.spec_version().unwrap_or("default");
        let relevant = catalog::tools_for_request(request);
        let (installed, missing) = catalog::partition_by_availability(&relevant, &self.cache);

        let message = if installed.is_empty() && !missing.is_empty() {
            catalog::format_missing_tools(&request.input_name(), &missing)
        } else {
            format!(
                "No generator found for input. Requested: format={}, version={}. \
                 Available formats: {}",
                request.format(),
                requested_version,
                format_format_map(&self.available_formats()),
            )
        };

        GenerationResult::failure("none", request.format(), requested_version, message)
    }

    /// Aggregate failure after every candidate was tried.
    fn all_failed_failure(
        &self,
        request: &GenerationRequest,
        last_error: Option<String>,
    ) -> GenerationResult {
        let requested_version = request.spec_version().unwrap_or("default");
        let last = last_error.unwrap_or_else(|| "unknown error".to_string());

        let relevant = catalog::tools_for_request(request);
        let (_, missing) = catalog::partition_by_availability(&relevant, &self.cache);

        let message = if missing.is_empty() {
            format!("All generators failed. Last error: {}", last)
        } else {
            let names: Vec<&str> = missing.iter().map(|t| t.command()).collect();
            format!(
                "All available generators failed. Last error: {}\n\
                 Additional tools that could help: {}\n\
                 Install them for more generation options.",
                last,
                names.join(", ")
            )
        };

        GenerationResult::failure("none", request.format(), requested_version, message)
    }

    /// Attach a validation report to a successful result.
    fn validate_result(&self, result: GenerationResult) -> GenerationResult {
        let Some(path) = result.output_path() else {
            return result;
        };

        let report = validate::validate_file(path, result.format(), result.spec_version());
        if report.is_failed() {
            tracing::warn!("SBOM validation failed: {}", report.summary());
        } else {
            tracing::info!(
                "SBOM validation {}: {} {}",
                report.summary(),
                result.format(),
                result.spec_version()
            );
        }

        result.with_validation(report)
    }
}

/// Best-effort text out of a panic payload.
fn panic_detail(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

/// Render a format/version union as `cyclonedx [1.5, 1.6], spdx [2.3]`.
fn format_format_map(formats: &BTreeMap<SbomFormat, Vec<String>>) -> String {
    if formats.is_empty() {
        return "none".to_string();
    }
    formats
        .iter()
        .map(|(format, versions)| format!("{} [{}]", format, versions.join(", ")))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Summary of one generator for display purposes.
#[derive(Debug, Clone)]
pub struct GeneratorSummary {
    /// Stable generator name
    pub name: &'static str,

    /// Selection priority, lower first
    pub priority: u32,

    /// The external tool behind the generator
    pub tool: ExternalTool,

    /// Declared format capabilities
    pub capabilities: Vec<FormatCapability>,

    /// Whether the tool is currently installed
    pub available: bool,
}

impl GeneratorSummary {
    /// Build a summary from a generator, probing availability through the cache.
    pub fn from_generator(generator: &dyn SbomGenerator, cache: &ToolCache) -> Self {
        GeneratorSummary {
            name: generator.name(),
            priority: generator.priority(),
            tool: generator.tool(),
            capabilities: generator.capabilities().to_vec(),
            available: cache.is_installed(generator.tool()),
        }
    }
}
