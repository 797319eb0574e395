//! cdxgen adapters for filesystem and container image scanning.
//!
//! cdxgen covers the widest ecosystem range of the generic scanners and
//! is the best tool for Java and Gradle lock files, hence its priority
//! slot above trivy and syft. It only emits CycloneDX; SPDX requests
//! never reach these adapters.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::generator::capability::{FormatCapability, SbomFormat};
use crate::generator::ecosystem::{self, Ecosystem};
use crate::generator::request::GenerationRequest;
use crate::generator::result::GenerationResult;
use crate::generator::trait_def::{GenerateContext, SbomGenerator};
use crate::tools::{ExternalTool, ToolCache};
use crate::util::process::ProcessBuilder;

use super::{lock_dir, run_tool, tool_program};

/// CycloneDX spec versions cdxgen can emit.
pub const CDXGEN_VERSIONS: &[&str] = &["1.4", "1.5", "1.6", "1.7"];

/// Spec version used when the request leaves it open.
pub const CDXGEN_DEFAULT: &str = "1.6";

/// Budget for one cdxgen run.
const CDXGEN_TIMEOUT: Duration = Duration::from_secs(600);

/// Ecosystems whose lock files cdxgen understands.
const CDXGEN_ECOSYSTEMS: &[Ecosystem] = &[
    Ecosystem::Python,
    Ecosystem::JavaScript,
    Ecosystem::Java,
    Ecosystem::Go,
    Ecosystem::Rust,
    Ecosystem::Ruby,
    Ecosystem::Dart,
    Ecosystem::Cpp,
    Ecosystem::Php,
    Ecosystem::DotNet,
    Ecosystem::Swift,
    Ecosystem::Elixir,
    Ecosystem::Scala,
];

fn capabilities() -> Vec<FormatCapability> {
    vec![
        FormatCapability::new(SbomFormat::CycloneDx, CDXGEN_VERSIONS, CDXGEN_DEFAULT)
            .expect("static capability table is valid"),
    ]
}

fn unsupported_version(name: &str, version: &str) -> GenerationResult {
    GenerationResult::failure(
        name,
        SbomFormat::CycloneDx,
        version,
        format!(
            "Unsupported CycloneDX version: {}. Supported: {}",
            version,
            CDXGEN_VERSIONS.join(", ")
        ),
    )
}

fn finish(name: &str, spec_version: &str, request: &GenerationRequest) -> GenerationResult {
    if !request.output_path().exists() {
        return GenerationResult::failure(
            name,
            SbomFormat::CycloneDx,
            spec_version,
            "cdxgen completed but output file not created",
        );
    }

    GenerationResult::success(
        name,
        SbomFormat::CycloneDx,
        spec_version,
        request.output_path(),
    )
}

/// cdxgen filesystem scanner for lock files.
pub struct CdxgenFsGenerator {
    cache: Arc<ToolCache>,
    capabilities: Vec<FormatCapability>,
}

impl CdxgenFsGenerator {
    /// Create the adapter over a shared availability cache.
    pub fn new(cache: Arc<ToolCache>) -> Self {
        CdxgenFsGenerator {
            cache,
            capabilities: capabilities(),
        }
    }

    fn build_command(
        &self,
        lock_file: &Path,
        spec_version: &str,
        output: &Path,
    ) -> ProcessBuilder {
        // cdxgen scans a directory, not a single file.
        ProcessBuilder::new(tool_program(&self.cache, ExternalTool::Cdxgen))
            .arg("-o")
            .arg(output)
            .args(["--spec-version", spec_version])
            .arg(lock_dir(lock_file))
    }
}

impl SbomGenerator for CdxgenFsGenerator {
    fn name(&self) -> &'static str {
        "cdxgen-fs"
    }

    fn priority(&self) -> u32 {
        20
    }

    fn tool(&self) -> ExternalTool {
        ExternalTool::Cdxgen
    }

    fn capabilities(&self) -> &[FormatCapability] {
        &self.capabilities
    }

    fn supports(&self, request: &GenerationRequest) -> bool {
        if !self.cache.is_installed(ExternalTool::Cdxgen) {
            return false;
        }
        if !request.is_lock_input() {
            return false;
        }
        request
            .lock_file_name()
            .map_or(false, |name| ecosystem::lock_file_in(name, CDXGEN_ECOSYSTEMS))
    }

    fn generate(
        &self,
        request: &GenerationRequest,
        ctx: &GenerateContext,
    ) -> Result<GenerationResult> {
        if let Some(version) = request.spec_version() {
            if !CDXGEN_VERSIONS.contains(&version) {
                return Ok(unsupported_version(self.name(), version));
            }
        }
        let spec_version = request.spec_version().unwrap_or(CDXGEN_DEFAULT);

        let Some(lock_file) = request.lock_file() else {
            return Ok(GenerationResult::failure(
                self.name(),
                SbomFormat::CycloneDx,
                spec_version,
                "cdxgen-fs only scans lock files",
            ));
        };

        tracing::info!(
            "Running cdxgen for {} (cyclonedx {})",
            request.lock_file_name().unwrap_or("lock file"),
            spec_version
        );

        let builder = self.build_command(lock_file, spec_version, request.output_path());
        match run_tool(&builder, "cdxgen", ctx.timeout.unwrap_or(CDXGEN_TIMEOUT)) {
            Ok(_) => Ok(finish(self.name(), spec_version, request)),
            Err(message) => Ok(GenerationResult::failure(
                self.name(),
                SbomFormat::CycloneDx,
                spec_version,
                message,
            )),
        }
    }
}

/// cdxgen container image scanner.
pub struct CdxgenImageGenerator {
    cache: Arc<ToolCache>,
    capabilities: Vec<FormatCapability>,
}

impl CdxgenImageGenerator {
    /// Create the adapter over a shared availability cache.
    pub fn new(cache: Arc<ToolCache>) -> Self {
        CdxgenImageGenerator {
            cache,
            capabilities: capabilities(),
        }
    }

    fn build_command(&self, image: &str, spec_version: &str, output: &Path) -> ProcessBuilder {
        ProcessBuilder::new(tool_program(&self.cache, ExternalTool::Cdxgen))
            .args(["-t", "oci", "-o"])
            .arg(output)
            .args(["--spec-version", spec_version])
            .arg(image)
    }
}

impl SbomGenerator for CdxgenImageGenerator {
    fn name(&self) -> &'static str {
        "cdxgen-image"
    }

    fn priority(&self) -> u32 {
        20
    }

    fn tool(&self) -> ExternalTool {
        ExternalTool::Cdxgen
    }

    fn capabilities(&self) -> &[FormatCapability] {
        &self.capabilities
    }

    fn supports(&self, request: &GenerationRequest) -> bool {
        self.cache.is_installed(ExternalTool::Cdxgen) && request.is_image_input()
    }

    fn generate(
        &self,
        request: &GenerationRequest,
        ctx: &GenerateContext,
    ) -> Result<GenerationResult> {
        if let Some(version) = request.spec_version() {
            if !CDXGEN_VERSIONS.contains(&version) {
                return Ok(unsupported_version(self.name(), version));
            }
        }
        let spec_version = request.spec_version().unwrap_or(CDXGEN_DEFAULT);

        let Some(image) = request.image() else {
            return Ok(GenerationResult::failure(
                self.name(),
                SbomFormat::CycloneDx,
                spec_version,
                "cdxgen-image only scans container images",
            ));
        };

        tracing::info!("Running cdxgen for {} (cyclonedx {})", image, spec_version);

        let builder = self.build_command(image, spec_version, request.output_path());
        match run_tool(&builder, "cdxgen", ctx.timeout.unwrap_or(CDXGEN_TIMEOUT)) {
            Ok(_) => Ok(finish(self.name(), spec_version, request)),
            Err(message) => Ok(GenerationResult::failure(
                self.name(),
                SbomFormat::CycloneDx,
                spec_version,
                message,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{cache_with_installed, cache_with_tool_at, stub_tool};
    use tempfile::TempDir;

    fn installed() -> Arc<ToolCache> {
        cache_with_installed(&[ExternalTool::Cdxgen])
    }

    #[test]
    fn test_fs_supports_broad_ecosystem_range() {
        let generator = CdxgenFsGenerator::new(installed());

        for name in ["pom.xml", "gradle.lockfile", "mix.lock", "build.sbt", "Cargo.lock"] {
            let request =
                GenerationRequest::for_lock_file(name, SbomFormat::CycloneDx, "bom.json");
            assert!(generator.supports(&request), "should support {}", name);
        }

        let terraform = GenerationRequest::for_lock_file(
            ".terraform.lock.hcl",
            SbomFormat::CycloneDx,
            "bom.json",
        );
        assert!(!generator.supports(&terraform));
    }

    #[test]
    fn test_fs_and_image_split_inputs() {
        let fs = CdxgenFsGenerator::new(installed());
        let image = CdxgenImageGenerator::new(installed());

        let lock = GenerationRequest::for_lock_file("go.mod", SbomFormat::CycloneDx, "bom.json");
        let oci = GenerationRequest::for_image("alpine:3.20", SbomFormat::CycloneDx, "bom.json");

        assert!(fs.supports(&lock));
        assert!(!fs.supports(&oci));
        assert!(image.supports(&oci));
        assert!(!image.supports(&lock));
    }

    #[test]
    fn test_fs_command_scans_lock_directory() {
        let generator = CdxgenFsGenerator::new(installed());
        let builder = generator.build_command(
            Path::new("services/api/package-lock.json"),
            "1.6",
            Path::new("bom.json"),
        );

        assert_eq!(
            builder.display_command(),
            "/usr/bin/cdxgen -o bom.json --spec-version 1.6 services/api"
        );
    }

    #[test]
    fn test_image_command_shape() {
        let generator = CdxgenImageGenerator::new(installed());
        let builder = generator.build_command("debian:12", "1.7", Path::new("bom.json"));

        assert_eq!(
            builder.display_command(),
            "/usr/bin/cdxgen -t oci -o bom.json --spec-version 1.7 debian:12"
        );
    }

    #[test]
    fn test_generate_rejects_unknown_version() {
        let generator = CdxgenFsGenerator::new(installed());
        let request = GenerationRequest::for_lock_file("go.mod", SbomFormat::CycloneDx, "bom.json")
            .with_spec_version(Some("1.0".to_string()));

        let result = generator.generate(&request, &GenerateContext::new()).unwrap();

        assert_eq!(
            result.error(),
            Some("Unsupported CycloneDX version: 1.0. Supported: 1.4, 1.5, 1.6, 1.7")
        );
    }

    #[test]
    fn test_generate_detects_missing_output_file() {
        let tmp = TempDir::new().unwrap();
        let stub = stub_tool(tmp.path(), "cdxgen", "exit 0");
        let generator = CdxgenFsGenerator::new(cache_with_tool_at(ExternalTool::Cdxgen, stub));

        let request = GenerationRequest::for_lock_file(
            tmp.path().join("go.mod"),
            SbomFormat::CycloneDx,
            tmp.path().join("bom.json"),
        );
        let result = generator.generate(&request, &GenerateContext::new()).unwrap();

        assert_eq!(
            result.error(),
            Some("cdxgen completed but output file not created")
        );
    }

    #[test]
    fn test_generate_succeeds_when_output_appears() {
        let tmp = TempDir::new().unwrap();
        // $2 is the value after -o.
        let stub = stub_tool(tmp.path(), "cdxgen", ": > \"$2\"");
        let generator = CdxgenFsGenerator::new(cache_with_tool_at(ExternalTool::Cdxgen, stub));

        let output = tmp.path().join("bom.json");
        let request = GenerationRequest::for_lock_file(
            tmp.path().join("go.mod"),
            SbomFormat::CycloneDx,
            &output,
        );
        let result = generator.generate(&request, &GenerateContext::new()).unwrap();

        assert!(result.is_success());
        assert_eq!(result.generator_name(), "cdxgen-fs");
        assert_eq!(result.output_path(), Some(output.as_path()));
    }
}
