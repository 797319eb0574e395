//! External tool discovery and availability caching.
//!
//! Every generator is backed by one executable from this module. Probing
//! the PATH is cheap but not free, and candidate filtering consults
//! availability for every registered generator, so results are cached for
//! the lifetime of a [`ToolCache`].

pub mod catalog;
pub mod version;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// External SBOM tools that back the built-in generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExternalTool {
    /// cyclonedx-py, the native Python generator
    CycloneDxPy,
    /// cargo-cyclonedx, the native Rust generator
    CargoCycloneDx,
    /// cdxgen, multi-ecosystem CycloneDX generator
    Cdxgen,
    /// trivy, scanner with SBOM output
    Trivy,
    /// syft, multi-ecosystem generator with version selection
    Syft,
}

impl ExternalTool {
    /// All known tools, in doctor/listing order.
    pub const ALL: [ExternalTool; 5] = [
        ExternalTool::CycloneDxPy,
        ExternalTool::CargoCycloneDx,
        ExternalTool::Cdxgen,
        ExternalTool::Trivy,
        ExternalTool::Syft,
    ];

    /// The executable name probed on the PATH.
    pub fn command(&self) -> &'static str {
        match self {
            ExternalTool::CycloneDxPy => "cyclonedx-py",
            ExternalTool::CargoCycloneDx => "cargo-cyclonedx",
            ExternalTool::Cdxgen => "cdxgen",
            ExternalTool::Trivy => "trivy",
            ExternalTool::Syft => "syft",
        }
    }
}

impl std::fmt::Display for ExternalTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.command())
    }
}

/// Probed availability of one tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolAvailability {
    /// Whether the executable was found
    pub installed: bool,

    /// Resolved path when found
    pub path: Option<PathBuf>,
}

impl ToolAvailability {
    /// An installed tool at the given path.
    pub fn installed(path: impl Into<PathBuf>) -> Self {
        ToolAvailability {
            installed: true,
            path: Some(path.into()),
        }
    }

    /// A tool that was not found on the PATH.
    pub fn missing() -> Self {
        ToolAvailability {
            installed: false,
            path: None,
        }
    }
}

/// Lazily populated cache of tool availability.
///
/// Each tool is probed at most once until `reset`, which drops every
/// entry so the next lookup probes again. `preset` seeds an entry
/// without touching the PATH: config overrides and hermetic tests both
/// go through it.
#[derive(Debug, Default)]
pub struct ToolCache {
    entries: Mutex<HashMap<ExternalTool, ToolAvailability>>,
}

impl ToolCache {
    /// Create an empty cache. Nothing is probed here.
    pub fn new() -> Self {
        ToolCache {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a tool, probing the PATH on a cache miss.
    pub fn availability(&self, tool: ExternalTool) -> ToolAvailability {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };

        entries
            .entry(tool)
            .or_insert_with(|| {
                let availability = match which::which(tool.command()) {
                    Ok(path) => ToolAvailability::installed(path),
                    Err(_) => ToolAvailability::missing(),
                };
                tracing::debug!(
                    "probed {}: {}",
                    tool,
                    if availability.installed {
                        "installed"
                    } else {
                        "not found"
                    }
                );
                availability
            })
            .clone()
    }

    /// Check whether a tool is installed.
    pub fn is_installed(&self, tool: ExternalTool) -> bool {
        self.availability(tool).installed
    }

    /// Resolved executable path, when installed.
    pub fn path(&self, tool: ExternalTool) -> Option<PathBuf> {
        self.availability(tool).path
    }

    /// Drop every cached entry so future lookups probe again.
    pub fn reset(&self) {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.clear();
    }

    /// Seed an entry without probing.
    pub fn preset(&self, tool: ExternalTool, availability: ToolAvailability) {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.insert(tool, availability);
    }
}
