//! Syft adapters for filesystem and container image scanning.
//!
//! Syft is the widest fallback tier: it emits both CycloneDX and SPDX
//! and selects the spec version through its output spec, written as
//! `format@version=file`.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::generator::capability::{FormatCapability, SbomFormat};
use crate::generator::ecosystem::{self, Ecosystem};
use crate::generator::request::GenerationRequest;
use crate::generator::result::GenerationResult;
use crate::generator::trait_def::{GenerateContext, SbomGenerator, DEFAULT_TIMEOUT};
use crate::tools::{ExternalTool, ToolCache};
use crate::util::process::ProcessBuilder;

use super::{run_tool, tool_program};

/// CycloneDX spec versions syft can emit.
pub const SYFT_CYCLONEDX_VERSIONS: &[&str] = &["1.2", "1.3", "1.4", "1.5", "1.6"];

/// CycloneDX version used when the request leaves it open.
pub const SYFT_CYCLONEDX_DEFAULT: &str = "1.6";

/// SPDX spec versions syft can emit.
pub const SYFT_SPDX_VERSIONS: &[&str] = &["2.2", "2.3"];

/// SPDX version used when the request leaves it open.
pub const SYFT_SPDX_DEFAULT: &str = "2.3";

/// Ecosystems whose lock files syft understands.
const SYFT_ECOSYSTEMS: &[Ecosystem] = &[
    Ecosystem::Python,
    Ecosystem::Rust,
    Ecosystem::JavaScript,
    Ecosystem::Ruby,
    Ecosystem::Go,
    Ecosystem::Dart,
    Ecosystem::Cpp,
    Ecosystem::Php,
    Ecosystem::DotNet,
    Ecosystem::Swift,
    Ecosystem::Elixir,
    Ecosystem::Terraform,
];

fn capabilities() -> Vec<FormatCapability> {
    vec![
        FormatCapability::new(
            SbomFormat::CycloneDx,
            SYFT_CYCLONEDX_VERSIONS,
            SYFT_CYCLONEDX_DEFAULT,
        )
        .expect("static capability table is valid"),
        FormatCapability::new(SbomFormat::Spdx, SYFT_SPDX_VERSIONS, SYFT_SPDX_DEFAULT)
            .expect("static capability table is valid"),
    ]
}

fn versions_for(format: SbomFormat) -> &'static [&'static str] {
    match format {
        SbomFormat::CycloneDx => SYFT_CYCLONEDX_VERSIONS,
        SbomFormat::Spdx => SYFT_SPDX_VERSIONS,
    }
}

fn default_version(format: SbomFormat) -> &'static str {
    match format {
        SbomFormat::CycloneDx => SYFT_CYCLONEDX_DEFAULT,
        SbomFormat::Spdx => SYFT_SPDX_DEFAULT,
    }
}

fn format_label(format: SbomFormat) -> &'static str {
    match format {
        SbomFormat::CycloneDx => "CycloneDX",
        SbomFormat::Spdx => "SPDX",
    }
}

/// Syft's `-o` value: `format@version=file`.
fn output_spec(format: SbomFormat, spec_version: &str, output: &Path) -> String {
    let format_str = match format {
        SbomFormat::CycloneDx => "cyclonedx-json",
        SbomFormat::Spdx => "spdx-json",
    };
    format!("{}@{}={}", format_str, spec_version, output.display())
}

/// Reject a request for a version syft cannot emit.
fn check_version(name: &str, request: &GenerationRequest) -> Option<GenerationResult> {
    let version = request.spec_version()?;
    if versions_for(request.format()).contains(&version) {
        return None;
    }

    Some(GenerationResult::failure(
        name,
        request.format(),
        version,
        format!(
            "Unsupported {} version: {}. Supported: {}",
            format_label(request.format()),
            version,
            versions_for(request.format()).join(", ")
        ),
    ))
}

/// Verify the document landed on disk and build the final result.
fn finish(name: &str, spec_version: &str, request: &GenerationRequest) -> GenerationResult {
    if !request.output_path().exists() {
        return GenerationResult::failure(
            name,
            request.format(),
            spec_version,
            "Syft completed but output file not created",
        );
    }

    GenerationResult::success(name, request.format(), spec_version, request.output_path())
}

/// Syft filesystem scanner for lock files.
pub struct SyftFsGenerator {
    cache: Arc<ToolCache>,
    capabilities: Vec<FormatCapability>,
}

impl SyftFsGenerator {
    /// Create the adapter over a shared availability cache.
    pub fn new(cache: Arc<ToolCache>) -> Self {
        SyftFsGenerator {
            cache,
            capabilities: capabilities(),
        }
    }

    fn build_command(
        &self,
        lock_file: &Path,
        source_name: &str,
        format: SbomFormat,
        spec_version: &str,
        output: &Path,
    ) -> ProcessBuilder {
        ProcessBuilder::new(tool_program(&self.cache, ExternalTool::Syft))
            .arg("scan")
            .arg(lock_file)
            .arg("-o")
            .arg(output_spec(format, spec_version, output))
            .args(["--source-name", source_name])
    }
}

impl SbomGenerator for SyftFsGenerator {
    fn name(&self) -> &'static str {
        "syft-fs"
    }

    fn priority(&self) -> u32 {
        35
    }

    fn tool(&self) -> ExternalTool {
        ExternalTool::Syft
    }

    fn capabilities(&self) -> &[FormatCapability] {
        &self.capabilities
    }

    fn supports(&self, request: &GenerationRequest) -> bool {
        if !self.cache.is_installed(ExternalTool::Syft) {
            return false;
        }
        if !request.is_lock_input() {
            return false;
        }
        request
            .lock_file_name()
            .map_or(false, |name| ecosystem::lock_file_in(name, SYFT_ECOSYSTEMS))
    }

    fn generate(
        &self,
        request: &GenerationRequest,
        ctx: &GenerateContext,
    ) -> Result<GenerationResult> {
        if let Some(result) = check_version(self.name(), request) {
            return Ok(result);
        }
        let spec_version = request
            .spec_version()
            .unwrap_or_else(|| default_version(request.format()));

        let Some(lock_file) = request.lock_file() else {
            return Ok(GenerationResult::failure(
                self.name(),
                request.format(),
                spec_version,
                "syft-fs only scans lock files",
            ));
        };
        let source_name = request.lock_file_name().unwrap_or("unknown");

        tracing::info!(
            "Running syft scan for {} ({} {})",
            source_name,
            request.format(),
            spec_version
        );

        let builder = self.build_command(
            lock_file,
            source_name,
            request.format(),
            spec_version,
            request.output_path(),
        );
        match run_tool(&builder, "syft", ctx.timeout.unwrap_or(DEFAULT_TIMEOUT)) {
            Ok(_) => Ok(finish(self.name(), spec_version, request)),
            Err(message) => Ok(GenerationResult::failure(
                self.name(),
                request.format(),
                spec_version,
                message,
            )),
        }
    }
}

/// Syft container image scanner.
pub struct SyftImageGenerator {
    cache: Arc<ToolCache>,
    capabilities: Vec<FormatCapability>,
}

impl SyftImageGenerator {
    /// Create the adapter over a shared availability cache.
    pub fn new(cache: Arc<ToolCache>) -> Self {
        SyftImageGenerator {
            cache,
            capabilities: capabilities(),
        }
    }

    fn build_command(
        &self,
        image: &str,
        format: SbomFormat,
        spec_version: &str,
        output: &Path,
    ) -> ProcessBuilder {
        ProcessBuilder::new(tool_program(&self.cache, ExternalTool::Syft))
            .arg("scan")
            .arg(image)
            .arg("-o")
            .arg(output_spec(format, spec_version, output))
    }
}

impl SbomGenerator for SyftImageGenerator {
    fn name(&self) -> &'static str {
        "syft-image"
    }

    fn priority(&self) -> u32 {
        35
    }

    fn tool(&self) -> ExternalTool {
        ExternalTool::Syft
    }

    fn capabilities(&self) -> &[FormatCapability] {
        &self.capabilities
    }

    fn supports(&self, request: &GenerationRequest) -> bool {
        self.cache.is_installed(ExternalTool::Syft) && request.is_image_input()
    }

    fn generate(
        &self,
        request: &GenerationRequest,
        ctx: &GenerateContext,
    ) -> Result<GenerationResult> {
        if let Some(result) = check_version(self.name(), request) {
            return Ok(result);
        }
        let spec_version = request
            .spec_version()
            .unwrap_or_else(|| default_version(request.format()));

        let Some(image) = request.image() else {
            return Ok(GenerationResult::failure(
                self.name(),
                request.format(),
                spec_version,
                "syft-image only scans container images",
            ));
        };

        tracing::info!(
            "Running syft scan for {} ({} {})",
            image,
            request.format(),
            spec_version
        );

        let builder =
            self.build_command(image, request.format(), spec_version, request.output_path());
        match run_tool(&builder, "syft", ctx.timeout.unwrap_or(DEFAULT_TIMEOUT)) {
            Ok(_) => Ok(finish(self.name(), spec_version, request)),
            Err(message) => Ok(GenerationResult::failure(
                self.name(),
                request.format(),
                spec_version,
                message,
            )),
        }
    }
}
