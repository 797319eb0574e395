//! Configuration file support.
//!
//! Purser reads two configuration file locations:
//! - Global: `~/.purser/config.toml` - user-wide defaults
//! - Project: `.purser/config.toml` - project-specific overrides
//!
//! Project config takes precedence over global config. Every setting is
//! optional; CLI flags override both.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::generator::capability::SbomFormat;
use crate::tools::{ExternalTool, ToolAvailability, ToolCache};

/// Purser configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generation defaults
    pub generate: GenerateConfig,

    /// Tool binary overrides
    pub tools: ToolsConfig,
}

/// Defaults for the `generate` command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Default output format (cyclonedx or spdx)
    pub format: Option<String>,

    /// Default spec version (e.g. "1.6")
    pub spec_version: Option<String>,

    /// Default output path
    pub output: Option<PathBuf>,

    /// Per-tool timeout override in seconds
    pub timeout_secs: Option<u64>,

    /// Whether to validate generated documents
    pub validate: Option<bool>,
}

/// Explicit binary paths for the external tools.
///
/// An override only wins when the file actually exists; a stale path is
/// warned about and the usual PATH probe runs instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Path to the trivy binary
    pub trivy: Option<PathBuf>,

    /// Path to the syft binary
    pub syft: Option<PathBuf>,

    /// Path to the cdxgen binary
    pub cdxgen: Option<PathBuf>,

    /// Path to the cyclonedx-py binary
    #[serde(rename = "cyclonedx-py")]
    pub cyclonedx_py: Option<PathBuf>,

    /// Path to the cargo-cyclonedx binary
    #[serde(rename = "cargo-cyclonedx")]
    pub cargo_cyclonedx: Option<PathBuf>,
}

impl GenerateConfig {
    /// Parse the configured format, if any.
    pub fn format(&self) -> Option<SbomFormat> {
        self.format.as_ref().and_then(|s| s.parse().ok())
    }

    /// Configured timeout as a duration.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl ToolsConfig {
    /// Configured path for one tool.
    pub fn path_for(&self, tool: ExternalTool) -> Option<&Path> {
        let path = match tool {
            ExternalTool::Trivy => &self.trivy,
            ExternalTool::Syft => &self.syft,
            ExternalTool::Cdxgen => &self.cdxgen,
            ExternalTool::CycloneDxPy => &self.cyclonedx_py,
            ExternalTool::CargoCycloneDx => &self.cargo_cyclonedx,
        };
        path.as_deref()
    }

    /// Seed an availability cache with the configured overrides.
    pub fn apply(&self, cache: &ToolCache) {
        for tool in ExternalTool::ALL {
            let Some(path) = self.path_for(tool) else {
                continue;
            };

            if path.exists() {
                cache.preset(tool, ToolAvailability::installed(path));
            } else {
                tracing::warn!(
                    "configured {} binary not found at {}, falling back to PATH",
                    tool,
                    path.display()
                );
            }
        }
    }

    /// Check if any tool path is configured.
    pub fn has_overrides(&self) -> bool {
        ExternalTool::ALL.iter().any(|t| self.path_for(*t).is_some())
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.generate.format.is_some() {
            self.generate.format = other.generate.format;
        }
        if other.generate.spec_version.is_some() {
            self.generate.spec_version = other.generate.spec_version;
        }
        if other.generate.output.is_some() {
            self.generate.output = other.generate.output;
        }
        if other.generate.timeout_secs.is_some() {
            self.generate.timeout_secs = other.generate.timeout_secs;
        }
        if other.generate.validate.is_some() {
            self.generate.validate = other.generate.validate;
        }

        if other.tools.trivy.is_some() {
            self.tools.trivy = other.tools.trivy;
        }
        if other.tools.syft.is_some() {
            self.tools.syft = other.tools.syft;
        }
        if other.tools.cdxgen.is_some() {
            self.tools.cdxgen = other.tools.cdxgen;
        }
        if other.tools.cyclonedx_py.is_some() {
            self.tools.cyclonedx_py = other.tools.cyclonedx_py;
        }
        if other.tools.cargo_cyclonedx.is_some() {
            self.tools.cargo_cyclonedx = other.tools.cargo_cyclonedx;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.purser/config.toml)
/// 2. Global config (~/.purser/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}

/// Load merged configuration from the default locations.
///
/// The project config is looked up under `project_root`; the global
/// config under the home directory. A missing home directory just means
/// no global layer.
pub fn load_default_config(project_root: &Path) -> Config {
    let global = global_config_path().unwrap_or_default();
    load_config(&global, &project_config_path(project_root))
}

/// Get the global purser config directory (~/.purser).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".purser"))
}

/// Get the global config path (~/.purser/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.purser/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".purser").join("config.toml")
}
