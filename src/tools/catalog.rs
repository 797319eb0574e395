//! Static catalog of the external tools and what they are good for.
//!
//! This is the data behind missing-tool diagnostics, `generators check`,
//! and the doctor command. Install instructions are kept verbatim per
//! platform so error messages can be pasted straight into a terminal.

use crate::generator::ecosystem::{ecosystem_for, Ecosystem};
use crate::generator::request::GenerationRequest;
use crate::tools::{ExternalTool, ToolCache};

/// Static information about one external tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Which tool this entry describes
    pub tool: ExternalTool,

    /// Human-facing name
    pub display_name: &'static str,

    /// One-line description
    pub description: &'static str,

    /// Multi-line install instructions
    pub install_lines: &'static [&'static str],

    /// Project homepage
    pub homepage: &'static str,

    /// What the tool is needed for
    pub required_for: &'static [&'static str],
}

static CATALOG: &[ToolInfo] = &[
    ToolInfo {
        tool: ExternalTool::CycloneDxPy,
        display_name: "cyclonedx-py",
        description: "Native CycloneDX generator for Python projects",
        install_lines: &[
            "Install via pip:",
            "  - pip install cyclonedx-bom",
            "  - uv pip install cyclonedx-bom",
        ],
        homepage: "https://github.com/CycloneDX/cyclonedx-python",
        required_for: &["Python lockfiles (requirements.txt, poetry.lock, Pipfile.lock)"],
    },
    ToolInfo {
        tool: ExternalTool::CargoCycloneDx,
        display_name: "cargo-cyclonedx",
        description: "Native CycloneDX generator for Rust projects",
        install_lines: &["Install via cargo:", "  - cargo install cargo-cyclonedx"],
        homepage: "https://github.com/CycloneDX/cyclonedx-rust-cargo",
        required_for: &["Rust lockfiles (Cargo.lock)"],
    },
    ToolInfo {
        tool: ExternalTool::Cdxgen,
        display_name: "cdxgen",
        description: "CycloneDX SBOM generator with extensive language support",
        install_lines: &[
            "Install via npm/bun:",
            "  - npm: npm install -g @cyclonedx/cdxgen",
            "  - bun: bun install -g @cyclonedx/cdxgen",
            "  - Docker: docker pull ghcr.io/cyclonedx/cdxgen",
        ],
        homepage: "https://github.com/CycloneDX/cdxgen",
        required_for: &["Java/Gradle projects", "Container images", "Many lockfile types"],
    },
    ToolInfo {
        tool: ExternalTool::Trivy,
        display_name: "Trivy",
        description: "Comprehensive vulnerability scanner and SBOM generator",
        install_lines: &[
            "Install via package manager:",
            "  - macOS: brew install trivy",
            "  - Linux: See https://aquasecurity.github.io/trivy/latest/getting-started/installation/",
            "  - Docker: docker pull aquasec/trivy",
        ],
        homepage: "https://trivy.dev",
        required_for: &["Container images", "Many lockfile types"],
    },
    ToolInfo {
        tool: ExternalTool::Syft,
        display_name: "Syft",
        description: "SBOM generator with broad ecosystem support",
        install_lines: &[
            "Install via package manager:",
            "  - macOS: brew install syft",
            "  - Linux: curl -sSfL https://raw.githubusercontent.com/anchore/syft/main/install.sh | sh -s -- -b /usr/local/bin",
            "  - Docker: docker pull anchore/syft",
        ],
        homepage: "https://github.com/anchore/syft",
        required_for: &["Container images", "Many lockfile types", "Terraform"],
    },
];

/// Look up the catalog entry for a tool.
pub fn info(tool: ExternalTool) -> &'static ToolInfo {
    let index = match tool {
        ExternalTool::CycloneDxPy => 0,
        ExternalTool::CargoCycloneDx => 1,
        ExternalTool::Cdxgen => 2,
        ExternalTool::Trivy => 3,
        ExternalTool::Syft => 4,
    };
    &CATALOG[index]
}

/// All catalog entries, in listing order.
pub fn all() -> &'static [ToolInfo] {
    CATALOG
}

/// Tools that could plausibly serve a request, in preference order.
///
/// This is a coarser net than generator capability matching on purpose:
/// it drives "install X and retry" suggestions, so it lists every tool
/// that understands the input at all, regardless of format or version.
pub fn tools_for_request(request: &GenerationRequest) -> Vec<ExternalTool> {
    if request.is_image_input() {
        return vec![ExternalTool::Trivy, ExternalTool::Syft, ExternalTool::Cdxgen];
    }

    match request.lock_file_name().and_then(ecosystem_for) {
        Some(Ecosystem::Python) => vec![
            ExternalTool::CycloneDxPy,
            ExternalTool::Cdxgen,
            ExternalTool::Trivy,
            ExternalTool::Syft,
        ],
        Some(Ecosystem::Rust) => vec![
            ExternalTool::CargoCycloneDx,
            ExternalTool::Cdxgen,
            ExternalTool::Trivy,
            ExternalTool::Syft,
        ],
        Some(Ecosystem::Java) => vec![
            ExternalTool::Cdxgen,
            ExternalTool::Trivy,
            ExternalTool::Syft,
        ],
        Some(Ecosystem::Dart) => vec![ExternalTool::Cdxgen, ExternalTool::Syft],
        Some(Ecosystem::Terraform) => vec![ExternalTool::Syft],
        _ => vec![
            ExternalTool::Cdxgen,
            ExternalTool::Trivy,
            ExternalTool::Syft,
        ],
    }
}

/// Split tools into (installed, missing) using the shared cache.
pub fn partition_by_availability(
    tools: &[ExternalTool],
    cache: &ToolCache,
) -> (Vec<ExternalTool>, Vec<ExternalTool>) {
    let mut installed = Vec::new();
    let mut missing = Vec::new();
    for tool in tools {
        if cache.is_installed(*tool) {
            installed.push(*tool);
        } else {
            missing.push(*tool);
        }
    }
    (installed, missing)
}

/// Build the install-guidance message shown when no tool can serve an input.
pub fn format_missing_tools(input_desc: &str, missing: &[ExternalTool]) -> String {
    let mut lines = vec![
        format!("No SBOM generators available for {}.", input_desc),
        String::new(),
        "Install one or more of these tools:".to_string(),
        String::new(),
    ];

    for tool in missing {
        let info = info(*tool);
        lines.push(format!("  {} ({}):", info.display_name, info.homepage));
        for install_line in info.install_lines {
            lines.push(format!("    {}", install_line));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Get a platform-specific one-line install hint.
pub fn install_hint(tool: ExternalTool) -> String {
    match tool {
        ExternalTool::CycloneDxPy => "pip install cyclonedx-bom".to_string(),
        ExternalTool::CargoCycloneDx => "cargo install cargo-cyclonedx".to_string(),
        ExternalTool::Cdxgen => "npm install -g @cyclonedx/cdxgen".to_string(),
        ExternalTool::Trivy => trivy_install_hint(),
        ExternalTool::Syft => syft_install_hint(),
    }
}

fn trivy_install_hint() -> String {
    #[cfg(target_os = "macos")]
    {
        "brew install trivy".to_string()
    }
    #[cfg(not(target_os = "macos"))]
    {
        "see https://trivy.dev for installation options".to_string()
    }
}

fn syft_install_hint() -> String {
    #[cfg(target_os = "macos")]
    {
        "brew install syft".to_string()
    }
    #[cfg(not(target_os = "macos"))]
    {
        "curl -sSfL https://raw.githubusercontent.com/anchore/syft/main/install.sh | sh -s -- -b /usr/local/bin"
            .to_string()
    }
}
