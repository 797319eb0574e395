//! Trivy adapters for filesystem and container image scanning.
//!
//! Trivy writes the SBOM to stdout instead of a file, so both adapters
//! parse stdout as JSON and persist it to the output path themselves.
//! Spec versions are pinned by the tool (CycloneDX 1.6, SPDX 2.3) with
//! no selection flag; other versions are filtered out by the capability
//! table before an adapter ever runs.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::generator::capability::{FormatCapability, SbomFormat};
use crate::generator::ecosystem::{self, Ecosystem};
use crate::generator::request::GenerationRequest;
use crate::generator::result::GenerationResult;
use crate::generator::trait_def::{GenerateContext, SbomGenerator, DEFAULT_TIMEOUT};
use crate::tools::{ExternalTool, ToolCache};
use crate::util::fs;
use crate::util::process::ProcessBuilder;

use super::{run_tool, tool_program};

/// The one CycloneDX spec version trivy emits.
pub const TRIVY_CYCLONEDX_VERSION: &str = "1.6";

/// The one SPDX spec version trivy emits.
pub const TRIVY_SPDX_VERSION: &str = "2.3";

/// Ecosystems whose lock files trivy understands.
const TRIVY_ECOSYSTEMS: &[Ecosystem] = &[
    Ecosystem::Python,
    Ecosystem::JavaScript,
    Ecosystem::Go,
    Ecosystem::Rust,
    Ecosystem::Ruby,
    Ecosystem::Java,
    Ecosystem::Cpp,
    Ecosystem::Php,
    Ecosystem::DotNet,
];

fn capabilities() -> Vec<FormatCapability> {
    vec![
        FormatCapability::new(
            SbomFormat::CycloneDx,
            &[TRIVY_CYCLONEDX_VERSION],
            TRIVY_CYCLONEDX_VERSION,
        )
        .expect("static capability table is valid"),
        FormatCapability::new(SbomFormat::Spdx, &[TRIVY_SPDX_VERSION], TRIVY_SPDX_VERSION)
            .expect("static capability table is valid"),
    ]
}

/// Trivy's name for each output format.
fn trivy_format(format: SbomFormat) -> &'static str {
    match format {
        SbomFormat::CycloneDx => "cyclonedx",
        SbomFormat::Spdx => "spdx-json",
    }
}

fn pinned_version(format: SbomFormat) -> &'static str {
    match format {
        SbomFormat::CycloneDx => TRIVY_CYCLONEDX_VERSION,
        SbomFormat::Spdx => TRIVY_SPDX_VERSION,
    }
}

/// Reject a request for a version trivy cannot pick.
fn check_pinned_version(name: &str, request: &GenerationRequest) -> Option<GenerationResult> {
    let version = request.spec_version()?;
    if version == pinned_version(request.format()) {
        return None;
    }

    Some(GenerationResult::failure(
        name,
        request.format(),
        version,
        format!(
            "trivy only emits {} {}",
            request.format(),
            pinned_version(request.format())
        ),
    ))
}

/// Parse trivy's stdout as JSON and persist it to the output path.
fn persist_stdout(
    name: &str,
    request: &GenerationRequest,
    spec_version: &str,
    stdout: &[u8],
) -> GenerationResult {
    let document: serde_json::Value = match serde_json::from_slice(stdout) {
        Ok(document) => document,
        Err(err) => {
            return GenerationResult::failure(
                name,
                request.format(),
                spec_version,
                format!("Invalid JSON output from trivy: {}", err),
            );
        }
    };

    if let Err(err) = fs::write_json_atomic(request.output_path(), &document) {
        return GenerationResult::failure(name, request.format(), spec_version, format!("{:#}", err));
    }

    GenerationResult::success(name, request.format(), spec_version, request.output_path())
}

/// Trivy filesystem scanner for lock files.
pub struct TrivyFsGenerator {
    cache: Arc<ToolCache>,
    capabilities: Vec<FormatCapability>,
}

impl TrivyFsGenerator {
    /// Create the adapter over a shared availability cache.
    pub fn new(cache: Arc<ToolCache>) -> Self {
        TrivyFsGenerator {
            cache,
            capabilities: capabilities(),
        }
    }

    fn build_command(&self, lock_file: &Path, format: SbomFormat) -> ProcessBuilder {
        ProcessBuilder::new(tool_program(&self.cache, ExternalTool::Trivy))
            .arg("fs")
            .arg(lock_file)
            .args(["--parallel", "0", "--format", trivy_format(format)])
    }
}

impl SbomGenerator for TrivyFsGenerator {
    fn name(&self) -> &'static str {
        "trivy-fs"
    }

    fn priority(&self) -> u32 {
        30
    }

    fn tool(&self) -> ExternalTool {
        ExternalTool::Trivy
    }

    fn capabilities(&self) -> &[FormatCapability] {
        &self.capabilities
    }

    fn supports(&self, request: &GenerationRequest) -> bool {
        if !self.cache.is_installed(ExternalTool::Trivy) {
            return false;
        }
        if !request.is_lock_input() {
            return false;
        }
        request
            .lock_file_name()
            .map_or(false, |name| ecosystem::lock_file_in(name, TRIVY_ECOSYSTEMS))
    }

    fn generate(
        &self,
        request: &GenerationRequest,
        ctx: &GenerateContext,
    ) -> Result<GenerationResult> {
        if let Some(result) = check_pinned_version(self.name(), request) {
            return Ok(result);
        }
        let spec_version = pinned_version(request.format());

        let Some(lock_file) = request.lock_file() else {
            return Ok(GenerationResult::failure(
                self.name(),
                request.format(),
                spec_version,
                "trivy-fs only scans lock files",
            ));
        };

        tracing::info!(
            "Running trivy fs for {} ({})",
            request.lock_file_name().unwrap_or("lock file"),
            request.format()
        );

        let builder = self.build_command(lock_file, request.format());
        match run_tool(&builder, "trivy", ctx.timeout.unwrap_or(DEFAULT_TIMEOUT)) {
            Ok(output) => Ok(persist_stdout(
                self.name(),
                request,
                spec_version,
                &output.stdout,
            )),
            Err(message) => Ok(GenerationResult::failure(
                self.name(),
                request.format(),
                spec_version,
                message,
            )),
        }
    }
}

/// Trivy container image scanner.
pub struct TrivyImageGenerator {
    cache: Arc<ToolCache>,
    capabilities: Vec<FormatCapability>,
}

impl TrivyImageGenerator {
    /// Create the adapter over a shared availability cache.
    pub fn new(cache: Arc<ToolCache>) -> Self {
        TrivyImageGenerator {
            cache,
            capabilities: capabilities(),
        }
    }

    fn build_command(&self, image: &str, format: SbomFormat) -> ProcessBuilder {
        // OS packages are what matter in a container image scan.
        ProcessBuilder::new(tool_program(&self.cache, ExternalTool::Trivy))
            .arg("image")
            .args(["--parallel", "0", "--format", trivy_format(format)])
            .args(["--pkg-types", "os"])
            .arg(image)
    }
}

impl SbomGenerator for TrivyImageGenerator {
    fn name(&self) -> &'static str {
        "trivy-image"
    }

    fn priority(&self) -> u32 {
        30
    }

    fn tool(&self) -> ExternalTool {
        ExternalTool::Trivy
    }

    fn capabilities(&self) -> &[FormatCapability] {
        &self.capabilities
    }

    fn supports(&self, request: &GenerationRequest) -> bool {
        self.cache.is_installed(ExternalTool::Trivy) && request.is_image_input()
    }

    fn generate(
        &self,
        request: &GenerationRequest,
        ctx: &GenerateContext,
    ) -> Result<GenerationResult> {
        if let Some(result) = check_pinned_version(self.name(), request) {
            return Ok(result);
        }
        let spec_version = pinned_version(request.format());

        let Some(image) = request.image() else {
            return Ok(GenerationResult::failure(
                self.name(),
                request.format(),
                spec_version,
                "trivy-image only scans container images",
            ));
        };

        tracing::info!("Running trivy image for {} ({})", image, request.format());

        let builder = self.build_command(image, request.format());
        match run_tool(&builder, "trivy", ctx.timeout.unwrap_or(DEFAULT_TIMEOUT)) {
            Ok(output) => Ok(persist_stdout(
                self.name(),
                request,
                spec_version,
                &output.stdout,
            )),
            Err(message) => Ok(GenerationResult::failure(
                self.name(),
                request.format(),
                spec_version,
                message,
            )),
        }
    }
}
