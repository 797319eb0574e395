//! cyclonedx-py adapter, the native generator for Python projects.
//!
//! cyclonedx-py resolves the declared dependency graph instead of
//! fingerprinting files, so it outranks the generic scanners for Python
//! lock files. Each lock file maps to a dedicated subcommand; poetry is
//! the odd one out, taking the project directory rather than the file.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::generator::capability::{FormatCapability, SbomFormat, CYCLONEDX_VERSIONS};
use crate::generator::request::GenerationRequest;
use crate::generator::result::GenerationResult;
use crate::generator::trait_def::{GenerateContext, SbomGenerator};
use crate::tools::{ExternalTool, ToolCache};
use crate::util::process::ProcessBuilder;

use super::{lock_dir, run_tool, tool_program};

/// Spec version used when the request leaves it open.
pub const CYCLONEDX_PY_DEFAULT: &str = "1.6";

/// Budget for one cyclonedx-py run.
const CYCLONEDX_PY_TIMEOUT: Duration = Duration::from_secs(300);

/// Lock files cyclonedx-py handles, with the subcommand for each.
///
/// `uv.lock` is deliberately absent: it is a Python lock file, but
/// cyclonedx-py cannot read it, so uv projects fall through to the
/// generic scanners.
const SUBCOMMANDS: &[(&str, &str)] = &[
    ("requirements.txt", "requirements"),
    ("poetry.lock", "poetry"),
    ("pyproject.toml", "poetry"),
    ("Pipfile.lock", "pipenv"),
];

fn subcommand_for(lock_file_name: &str) -> Option<&'static str> {
    SUBCOMMANDS
        .iter()
        .find(|(name, _)| *name == lock_file_name)
        .map(|(_, subcommand)| *subcommand)
}

fn capabilities() -> Vec<FormatCapability> {
    vec![
        FormatCapability::new(SbomFormat::CycloneDx, CYCLONEDX_VERSIONS, CYCLONEDX_PY_DEFAULT)
            .expect("static capability table is valid"),
    ]
}

/// Native CycloneDX generator for Python lock files.
pub struct CycloneDxPyGenerator {
    cache: Arc<ToolCache>,
    capabilities: Vec<FormatCapability>,
}

impl CycloneDxPyGenerator {
    /// Create the adapter over a shared availability cache.
    pub fn new(cache: Arc<ToolCache>) -> Self {
        CycloneDxPyGenerator {
            cache,
            capabilities: capabilities(),
        }
    }

    fn build_command(
        &self,
        lock_file: &Path,
        subcommand: &str,
        spec_version: &str,
        output: &Path,
    ) -> ProcessBuilder {
        let mut builder =
            ProcessBuilder::new(tool_program(&self.cache, ExternalTool::CycloneDxPy))
                .arg(subcommand);

        // Poetry reads the project directory; the other subcommands take
        // the lock file itself.
        if subcommand == "poetry" {
            let project_dir = lock_dir(lock_file);
            tracing::info!("Using Poetry project directory: {}", project_dir.display());
            builder = builder.arg(project_dir);
        } else {
            builder = builder.arg(lock_file);
        }

        builder = builder
            .args(["--spec-version", spec_version])
            .arg("--output-file")
            .arg(output)
            .args([
                "--mc-type",
                "application",
                "--validate",
                "--output-reproducible",
                "--output-format",
                "JSON",
            ]);

        if subcommand == "poetry" {
            builder = builder.arg("--no-dev");
        }

        builder
    }
}

impl SbomGenerator for CycloneDxPyGenerator {
    fn name(&self) -> &'static str {
        "cyclonedx-py"
    }

    fn priority(&self) -> u32 {
        10
    }

    fn tool(&self) -> ExternalTool {
        ExternalTool::CycloneDxPy
    }

    fn capabilities(&self) -> &[FormatCapability] {
        &self.capabilities
    }

    fn supports(&self, request: &GenerationRequest) -> bool {
        if !self.cache.is_installed(ExternalTool::CycloneDxPy) {
            return false;
        }
        if !request.is_lock_input() {
            return false;
        }
        request
            .lock_file_name()
            .map_or(false, |name| subcommand_for(name).is_some())
    }

    fn generate(
        &self,
        request: &GenerationRequest,
        ctx: &GenerateContext,
    ) -> Result<GenerationResult> {
        if let Some(version) = request.spec_version() {
            if !CYCLONEDX_VERSIONS.contains(&version) {
                return Ok(GenerationResult::failure(
                    self.name(),
                    SbomFormat::CycloneDx,
                    version,
                    format!(
                        "Unsupported CycloneDX version: {}. Supported: {}",
                        version,
                        CYCLONEDX_VERSIONS.join(", ")
                    ),
                ));
            }
        }
        let spec_version = request.spec_version().unwrap_or(CYCLONEDX_PY_DEFAULT);

        let (Some(lock_file), Some(lock_name)) = (request.lock_file(), request.lock_file_name())
        else {
            return Ok(GenerationResult::failure(
                self.name(),
                SbomFormat::CycloneDx,
                spec_version,
                "cyclonedx-py only scans lock files",
            ));
        };

        let Some(subcommand) = subcommand_for(lock_name) else {
            return Ok(GenerationResult::failure(
                self.name(),
                SbomFormat::CycloneDx,
                spec_version,
                format!("Unsupported lock file: {}", lock_name),
            ));
        };

        tracing::info!("Running cyclonedx-py {} for {}", subcommand, lock_name);

        let builder =
            self.build_command(lock_file, subcommand, spec_version, request.output_path());
        match run_tool(
            &builder,
            "cyclonedx-py",
            ctx.timeout.unwrap_or(CYCLONEDX_PY_TIMEOUT),
        ) {
            Ok(_) => Ok(GenerationResult::success(
                self.name(),
                SbomFormat::CycloneDx,
                spec_version,
                request.output_path(),
            )),
            Err(message) => Ok(GenerationResult::failure(
                self.name(),
                SbomFormat::CycloneDx,
                spec_version,
                message,
            )),
        }
    }
}
