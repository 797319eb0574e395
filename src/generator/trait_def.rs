//! SbomGenerator trait definition and the generation context.
//!
//! The trait is purely operational - candidate selection is driven by the
//! capability data and the `supports` predicate, both of which must stay
//! side-effect free so the registry can filter without spawning anything.

use std::time::Duration;

use anyhow::Result;

use crate::generator::capability::{FormatCapability, SbomFormat};
use crate::generator::request::GenerationRequest;
use crate::generator::result::GenerationResult;
use crate::tools::ExternalTool;

/// Wall-clock budget for tools without a tighter one of their own.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1800);

/// Context passed to generator operations.
#[derive(Debug, Clone)]
pub struct GenerateContext {
    /// Wall-clock budget override for the external tool.
    ///
    /// `None` lets each adapter apply its own tool's budget.
    pub timeout: Option<Duration>,

    /// Verbose output
    pub verbose: bool,
}

impl GenerateContext {
    /// Create a context with per-tool default timeouts.
    pub fn new() -> Self {
        GenerateContext {
            timeout: None,
            verbose: false,
        }
    }

    /// Override every tool's timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for GenerateContext {
    fn default() -> Self {
        Self::new()
    }
}

/// SbomGenerator trait - interface for external SBOM tool adapters.
///
/// Implementations wrap exactly one external tool invocation style. The
/// registry tries candidates in ascending `priority` order; equal
/// priorities keep their registration order.
pub trait SbomGenerator: Send + Sync {
    /// Stable name used in logs, listings, and results.
    fn name(&self) -> &'static str;

    /// Selection priority. Lower values are tried first.
    fn priority(&self) -> u32;

    /// The external tool this adapter drives.
    fn tool(&self) -> ExternalTool;

    /// Formats and spec versions this generator can emit.
    fn capabilities(&self) -> &[FormatCapability];

    /// Check whether this generator can serve the request's input.
    ///
    /// Covers tool availability and input kind only; format and version
    /// matching is the registry's filter via `supports_format`. Must not
    /// spawn processes; availability comes from the shared tool cache.
    fn supports(&self, request: &GenerationRequest) -> bool;

    /// Run the external tool and report the outcome.
    ///
    /// Ordinary tool failures come back as failed results so the registry
    /// can fall through to the next candidate. An `Err` is reserved for
    /// conditions the adapter did not anticipate.
    fn generate(
        &self,
        request: &GenerationRequest,
        ctx: &GenerateContext,
    ) -> Result<GenerationResult>;

    /// Find the capability entry for one format, if declared.
    fn capability_for(&self, format: SbomFormat) -> Option<&FormatCapability> {
        self.capabilities().iter().find(|c| c.format() == format)
    }

    /// Check whether a format (and version, when requested) is covered.
    fn supports_format(&self, format: SbomFormat, spec_version: Option<&str>) -> bool {
        match self.capability_for(format) {
            Some(cap) => spec_version.map_or(true, |v| cap.supports_version(v)),
            None => false,
        }
    }
}
