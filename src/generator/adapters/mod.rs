//! Adapters for the external SBOM tools.
//!
//! One module per tool, one generator per invocation style a tool offers
//! (filesystem scan vs container image scan). Every adapter funnels its
//! execution through [`run_tool`], which maps the usual ways a tool dies
//! (non-zero exit, deadline, missing binary) onto the failure strings
//! recorded on results.

pub mod cargo_cyclonedx;
pub mod cdxgen;
pub mod cyclonedx_py;
pub mod syft;
pub mod trivy;

pub use cargo_cyclonedx::CargoCycloneDxGenerator;
pub use cdxgen::{CdxgenFsGenerator, CdxgenImageGenerator};
pub use cyclonedx_py::CycloneDxPyGenerator;
pub use syft::{SyftFsGenerator, SyftImageGenerator};
pub use trivy::{TrivyFsGenerator, TrivyImageGenerator};

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::time::Duration;

use crate::tools::{ExternalTool, ToolCache};
use crate::util::process::{ExecOutcome, ProcessBuilder};

/// Resolve the program to invoke for a tool.
///
/// Prefers the cached path, which reflects any configured override, and
/// falls back to the bare command name.
pub(crate) fn tool_program(cache: &ToolCache, tool: ExternalTool) -> PathBuf {
    cache
        .path(tool)
        .unwrap_or_else(|| PathBuf::from(tool.command()))
}

/// Directory containing a lock file, usable as a command argument.
pub(crate) fn lock_dir(lock_file: &Path) -> &Path {
    match lock_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Run a tool command and map the common failure shapes to messages.
///
/// A completed, successful run returns the raw output so adapters can
/// read stdout. Everything else comes back as `Err(message)` ready to be
/// recorded on a failure result; stderr from a failed run is logged, not
/// returned.
pub(crate) fn run_tool(
    builder: &ProcessBuilder,
    name: &str,
    timeout: Duration,
) -> Result<Output, String> {
    match builder.exec_with_timeout(timeout) {
        Ok(ExecOutcome::Completed(output)) => {
            if output.status.success() {
                return Ok(output);
            }

            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            if !stderr.is_empty() {
                tracing::error!("[{}] error: {}", name, stderr);
            }

            Err(format!(
                "{} command failed with return code {}",
                name,
                exit_label(&output.status)
            ))
        }
        Ok(ExecOutcome::TimedOut { elapsed }) => {
            tracing::error!(
                "{} command timed out after {}s (limit: {}s)",
                name,
                elapsed.as_secs(),
                timeout.as_secs()
            );
            Err(format!("{} command timed out", name))
        }
        Err(err) => {
            if spawn_not_found(&err) {
                tracing::error!("{} command not found", name);
                Err(format!("{} command not found - is it installed?", name))
            } else {
                Err(format!("{} failed to start: {:#}", name, err))
            }
        }
    }
}

fn exit_label(status: &ExitStatus) -> String {
    match status.code() {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

fn spawn_not_found(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<std::io::Error>())
        .any(|io| io.kind() == std::io::ErrorKind::NotFound)
}
