//! Environment and toolchain health checks.
//!
//! The `doctor` command performs fast environment checks to verify
//! which SBOM generation tools are available and properly configured.
//!
//! ## Usage
//!
//! ```bash
//! purser doctor           # Quick check
//! purser doctor --verbose # Detailed output
//! ```
//!
//! ## Checks Performed
//!
//! - Each of the five generation tools (cyclonedx-py, cargo-cyclonedx,
//!   cdxgen, trivy, syft), path and version
//! - At least one generation tool present (the only required check)
//! - Config file presence (global and project)

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::tools::version::detect_tool_version;
use crate::tools::{catalog, ExternalTool, ToolCache};
use crate::util::config;

/// Result of a single health check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,

    /// Whether the check passed
    pub passed: bool,

    /// Human-readable status message
    pub message: String,

    /// Path to the tool (if applicable)
    pub path: Option<PathBuf>,

    /// Version string (if applicable)
    pub version: Option<String>,

    /// How long the check took
    pub duration: Duration,

    /// Whether this check is required or optional
    pub required: bool,
}

impl CheckResult {
    /// Create a passing check result.
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: true,
            message: message.into(),
            path: None,
            version: None,
            duration: Duration::ZERO,
            required: true,
        }
    }

    /// Create a failing check result.
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: false,
            message: message.into(),
            path: None,
            version: None,
            duration: Duration::ZERO,
            required: true,
        }
    }

    /// Mark this check as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set the tool path.
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    /// Set the version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Summary of all health checks.
#[derive(Debug, Clone)]
pub struct DoctorReport {
    /// Individual check results
    pub checks: Vec<CheckResult>,

    /// Total time taken
    pub total_duration: Duration,

    /// Environment information
    pub environment: HashMap<String, String>,
}

impl DoctorReport {
    /// Create a new empty report.
    pub fn new() -> Self {
        DoctorReport {
            checks: Vec::new(),
            total_duration: Duration::ZERO,
            environment: HashMap::new(),
        }
    }

    /// Add a check result.
    pub fn add(&mut self, check: CheckResult) {
        self.checks.push(check);
    }

    /// Check if all required checks passed.
    pub fn all_required_passed(&self) -> bool {
        self.checks.iter().filter(|c| c.required).all(|c| c.passed)
    }

    /// Get the count of passed checks.
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Get the count of failed checks.
    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    /// Get the count of required failed checks.
    pub fn required_failed_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.required && !c.passed)
            .count()
    }
}

impl Default for DoctorReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for the doctor command.
#[derive(Debug, Clone, Default)]
pub struct DoctorOptions {
    /// Include verbose output
    pub verbose: bool,
}

/// Run the doctor command.
pub fn doctor(_options: DoctorOptions) -> Result<DoctorReport> {
    let start = Instant::now();
    let mut report = DoctorReport::new();

    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let config = config::load_default_config(&cwd);

    let cache = ToolCache::new();
    config.tools.apply(&cache);

    // Collect environment info
    report
        .environment
        .insert("os".to_string(), std::env::consts::OS.to_string());
    report
        .environment
        .insert("arch".to_string(), std::env::consts::ARCH.to_string());

    // One check per generation tool
    for tool in ExternalTool::ALL {
        report.add(check_tool(tool, &cache));
    }

    // At least one of them must be installed
    report.add(check_generation_tools(&cache));

    // Config file presence
    report.add(check_config_files(&cwd));

    report.total_duration = start.elapsed();
    Ok(report)
}

/// Check a single generation tool: on PATH (or overridden), plus version.
fn check_tool(tool: ExternalTool, cache: &ToolCache) -> CheckResult {
    let start = Instant::now();
    let info = catalog::info(tool);

    let Some(path) = cache.path(tool) else {
        return CheckResult::fail(
            info.display_name,
            format!(
                "{} not found (needed for: {}). Install with: {}",
                tool.command(),
                info.required_for.join(", "),
                catalog::install_hint(tool)
            ),
        )
        .with_duration(start.elapsed())
        .optional();
    };

    match detect_tool_version(&path) {
        Ok(version) => CheckResult::pass(
            info.display_name,
            format!("{} is available", tool.command()),
        )
        .with_path(path)
        .with_version(version.to_string())
        .with_duration(start.elapsed())
        .optional(),
        Err(_) => CheckResult::pass(
            info.display_name,
            format!("{} is available (version unknown)", tool.command()),
        )
        .with_path(path)
        .with_duration(start.elapsed())
        .optional(),
    }
}

/// The one required check: at least one generation tool is installed.
fn check_generation_tools(cache: &ToolCache) -> CheckResult {
    let start = Instant::now();

    let installed: Vec<&str> = ExternalTool::ALL
        .iter()
        .filter(|tool| cache.is_installed(**tool))
        .map(|tool| tool.command())
        .collect();

    if installed.is_empty() {
        let all: Vec<&str> = ExternalTool::ALL.iter().map(|t| t.command()).collect();
        CheckResult::fail(
            "Generation tools",
            format!(
                "No SBOM generation tool found. Install at least one of: {}",
                all.join(", ")
            ),
        )
        .with_duration(start.elapsed())
    } else {
        CheckResult::pass(
            "Generation tools",
            format!(
                "{} of {} tools installed ({})",
                installed.len(),
                ExternalTool::ALL.len(),
                installed.join(", ")
            ),
        )
        .with_duration(start.elapsed())
    }
}

/// Report which config files are in effect, if any.
fn check_config_files(cwd: &Path) -> CheckResult {
    let start = Instant::now();

    let mut found = Vec::new();
    if let Some(path) = config::global_config_path() {
        if path.exists() {
            found.push(path);
        }
    }
    let project = config::project_config_path(cwd);
    if project.exists() {
        found.push(project);
    }

    let message = if found.is_empty() {
        "No config file found (defaults in effect)".to_string()
    } else {
        let names: Vec<String> = found.iter().map(|p| p.display().to_string()).collect();
        format!("Found {}", names.join(", "))
    };

    let mut check = CheckResult::pass("Config", message)
        .with_duration(start.elapsed())
        .optional();
    if let Some(path) = found.into_iter().next() {
        check = check.with_path(path);
    }
    check
}

/// Format the doctor report for display.
pub fn format_report(report: &DoctorReport, verbose: bool) -> String {
    use std::fmt::Write;

    let mut output = String::new();

    writeln!(output, "Purser Doctor").unwrap();
    writeln!(output, "=============\n").unwrap();

    // Environment
    if verbose {
        writeln!(output, "Environment:").unwrap();
        writeln!(
            output,
            "  OS: {} ({})",
            report
                .environment
                .get("os")
                .unwrap_or(&"unknown".to_string()),
            report
                .environment
                .get("arch")
                .unwrap_or(&"unknown".to_string())
        )
        .unwrap();
        writeln!(output).unwrap();
    }

    // Checks
    writeln!(output, "Checks:").unwrap();
    for check in &report.checks {
        let status = if check.passed { "[OK]" } else { "[!!]" };
        let required = if check.required { "" } else { " (optional)" };

        writeln!(output, "  {} {}{}", status, check.name, required).unwrap();

        if verbose {
            writeln!(output, "      {}", check.message).unwrap();
            if let Some(path) = &check.path {
                writeln!(output, "      Path: {}", path.display()).unwrap();
            }
            if let Some(version) = &check.version {
                writeln!(output, "      Version: {}", version).unwrap();
            }
        }
    }

    writeln!(output).unwrap();

    // Summary
    let passed = report.passed_count();
    let failed = report.failed_count();
    let required_failed = report.required_failed_count();

    writeln!(output, "Summary: {} passed, {} failed", passed, failed).unwrap();

    if required_failed > 0 {
        writeln!(
            output,
            "\nWarning: {} required check(s) failed. SBOM generation will not work.",
            required_failed
        )
        .unwrap();
    } else if failed > 0 {
        writeln!(
            output,
            "\nAll required checks passed. {} optional check(s) failed.",
            failed
        )
        .unwrap();
    } else {
        writeln!(output, "\nAll checks passed. Purser is ready to use.").unwrap();
    }

    output
}
