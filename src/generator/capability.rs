//! Format capability types - hard facts about what generators can emit.
//!
//! Capabilities are immutable declarations made by generators, not
//! configuration. The registry consults them when matching a request to
//! candidate generators; a generator never sees a request it declared
//! itself unable to serve.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every CycloneDX spec version any known tool can emit.
pub const CYCLONEDX_VERSIONS: &[&str] = &["1.0", "1.1", "1.2", "1.3", "1.4", "1.5", "1.6", "1.7"];

/// Every SPDX spec version any known tool can emit.
pub const SPDX_VERSIONS: &[&str] = &["2.2", "2.3"];

/// Output format of a generated SBOM document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SbomFormat {
    /// CycloneDX JSON
    CycloneDx,
    /// SPDX JSON
    Spdx,
}

impl SbomFormat {
    /// Get the format name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SbomFormat::CycloneDx => "cyclonedx",
            SbomFormat::Spdx => "spdx",
        }
    }
}

impl std::fmt::Display for SbomFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SbomFormat {
    type Err = SbomFormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cyclonedx" => Ok(SbomFormat::CycloneDx),
            "spdx" => Ok(SbomFormat::Spdx),
            _ => Err(SbomFormatParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid SBOM format name.
#[derive(Debug, Clone)]
pub struct SbomFormatParseError(pub String);

impl std::fmt::Display for SbomFormatParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid SBOM format '{}', valid values: cyclonedx, spdx",
            self.0
        )
    }
}

impl std::error::Error for SbomFormatParseError {}

/// Error returned when a capability declaration is inconsistent.
#[derive(Debug, Clone, Error)]
pub enum CapabilityError {
    /// The version list was empty.
    #[error("capability for {format} must list at least one spec version")]
    EmptyVersions {
        /// Format the capability was declared for
        format: SbomFormat,
    },

    /// The default version is not in the supported set.
    #[error("default version {default} is not in the supported set for {format}")]
    DefaultNotListed {
        /// Format the capability was declared for
        format: SbomFormat,
        /// The offending default
        default: String,
    },
}

/// One format a generator can emit, with the spec versions it supports.
///
/// Construction is validated: the version list must be non-empty and the
/// default must be one of the listed versions. Fields stay private so a
/// capability can never drift into an inconsistent state after the fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatCapability {
    format: SbomFormat,
    versions: Vec<String>,
    default_version: String,
}

impl FormatCapability {
    /// Create a validated capability declaration.
    pub fn new(
        format: SbomFormat,
        versions: &[&str],
        default_version: &str,
    ) -> Result<Self, CapabilityError> {
        if versions.is_empty() {
            return Err(CapabilityError::EmptyVersions { format });
        }
        if !versions.contains(&default_version) {
            return Err(CapabilityError::DefaultNotListed {
                format,
                default: default_version.to_string(),
            });
        }

        Ok(FormatCapability {
            format,
            versions: versions.iter().map(|v| v.to_string()).collect(),
            default_version: default_version.to_string(),
        })
    }

    /// The format this capability describes.
    pub fn format(&self) -> SbomFormat {
        self.format
    }

    /// All supported spec versions, in declaration order.
    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// The version used when the caller does not request one.
    pub fn default_version(&self) -> &str {
        &self.default_version
    }

    /// Check whether a specific spec version is supported.
    pub fn supports_version(&self, version: &str) -> bool {
        self.versions.iter().any(|v| v == version)
    }
}
