//! cargo-cyclonedx adapter, the native generator for Rust projects.
//!
//! cargo-cyclonedx must run from the directory holding `Cargo.lock`, so
//! the adapter switches the child's working directory and absolutizes the
//! output path first. Left unguided the tool invents `<crate>.cdx.json`
//! naming, so `--output-file` is always passed.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::generator::capability::{FormatCapability, SbomFormat};
use crate::generator::request::GenerationRequest;
use crate::generator::result::GenerationResult;
use crate::generator::trait_def::{GenerateContext, SbomGenerator};
use crate::tools::{ExternalTool, ToolCache};
use crate::util::fs;
use crate::util::process::ProcessBuilder;

use super::{lock_dir, run_tool, tool_program};

/// CycloneDX spec versions cargo-cyclonedx can emit.
pub const CARGO_CYCLONEDX_VERSIONS: &[&str] = &["1.4", "1.5", "1.6"];

/// Spec version used when the request leaves it open.
pub const CARGO_CYCLONEDX_DEFAULT: &str = "1.6";

/// Budget for one cargo-cyclonedx run.
const CARGO_CYCLONEDX_TIMEOUT: Duration = Duration::from_secs(300);

fn capabilities() -> Vec<FormatCapability> {
    vec![FormatCapability::new(
        SbomFormat::CycloneDx,
        CARGO_CYCLONEDX_VERSIONS,
        CARGO_CYCLONEDX_DEFAULT,
    )
    .expect("static capability table is valid")]
}

/// Native CycloneDX generator for Rust Cargo projects.
pub struct CargoCycloneDxGenerator {
    cache: Arc<ToolCache>,
    capabilities: Vec<FormatCapability>,
}

impl CargoCycloneDxGenerator {
    /// Create the adapter over a shared availability cache.
    pub fn new(cache: Arc<ToolCache>) -> Self {
        CargoCycloneDxGenerator {
            cache,
            capabilities: capabilities(),
        }
    }

    fn build_command(
        &self,
        project_dir: &std::path::Path,
        spec_version: &str,
        output_file: &std::path::Path,
    ) -> ProcessBuilder {
        ProcessBuilder::new(tool_program(&self.cache, ExternalTool::CargoCycloneDx))
            .arg("cyclonedx")
            .args(["--spec-version", spec_version, "--format", "json"])
            .arg("--output-file")
            .arg(output_file)
            .cwd(project_dir)
    }
}

impl SbomGenerator for CargoCycloneDxGenerator {
    fn name(&self) -> &'static str {
        "cargo-cyclonedx"
    }

    fn priority(&self) -> u32 {
        10
    }

    fn tool(&self) -> ExternalTool {
        ExternalTool::CargoCycloneDx
    }

    fn capabilities(&self) -> &[FormatCapability] {
        &self.capabilities
    }

    fn supports(&self, request: &GenerationRequest) -> bool {
        if !self.cache.is_installed(ExternalTool::CargoCycloneDx) {
            return false;
        }
        if !request.is_lock_input() {
            return false;
        }
        request.lock_file_name() == Some("Cargo.lock")
    }

    fn generate(
        &self,
        request: &GenerationRequest,
        ctx: &GenerateContext,
    ) -> Result<GenerationResult> {
        if let Some(version) = request.spec_version() {
            if !CARGO_CYCLONEDX_VERSIONS.contains(&version) {
                return Ok(GenerationResult::failure(
                    self.name(),
                    SbomFormat::CycloneDx,
                    version,
                    format!(
                        "Unsupported CycloneDX version: {}. Supported: {}",
                        version,
                        CARGO_CYCLONEDX_VERSIONS.join(", ")
                    ),
                ));
            }
        }
        let spec_version = request.spec_version().unwrap_or(CARGO_CYCLONEDX_DEFAULT);

        let Some(lock_file) = request.lock_file() else {
            return Ok(GenerationResult::failure(
                self.name(),
                SbomFormat::CycloneDx,
                spec_version,
                "cargo-cyclonedx only scans Cargo.lock files",
            ));
        };

        // The child runs from the project directory, so the output path
        // has to survive the cwd change.
        let output_file = match fs::absolute_path(request.output_path()) {
            Ok(path) => path,
            Err(err) => {
                return Ok(GenerationResult::failure(
                    self.name(),
                    SbomFormat::CycloneDx,
                    spec_version,
                    format!("{:#}", err),
                ));
            }
        };
        let project_dir = lock_dir(lock_file);

        tracing::info!(
            "Running cargo-cyclonedx for {} (CycloneDX {})",
            request.lock_file_name().unwrap_or("Cargo.lock"),
            spec_version
        );

        let builder = self.build_command(project_dir, spec_version, &output_file);
        match run_tool(
            &builder,
            "cargo-cyclonedx",
            ctx.timeout.unwrap_or(CARGO_CYCLONEDX_TIMEOUT),
        ) {
            Ok(_) => {
                if !output_file.exists() {
                    return Ok(GenerationResult::failure(
                        self.name(),
                        SbomFormat::CycloneDx,
                        spec_version,
                        "cargo-cyclonedx completed but output file not created",
                    ));
                }

                Ok(GenerationResult::success(
                    self.name(),
                    SbomFormat::CycloneDx,
                    spec_version,
                    output_file,
                ))
            }
            Err(message) => Ok(GenerationResult::failure(
                self.name(),
                SbomFormat::CycloneDx,
                spec_version,
                message,
            )),
        }
    }
}
