//! Implementation of `purser generate`.
//!
//! Every setting resolves in the same order: CLI flag, then project
//! config, then global config, then built-in default. Input resolution
//! turns a directory into its best-ranked lock file before the registry
//! ever sees the request, so adapters only deal with concrete files.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};

use crate::generator::{
    default_registry, find_lock_file, GenerateContext, GenerationRequest, GenerationResult,
    GeneratorRegistry, SbomFormat,
};
use crate::tools::ToolCache;
use crate::util::config;
use crate::util::diagnostic::NoLockFileError;
use crate::util::fs;

/// Default output file when neither flag nor config names one.
pub const DEFAULT_OUTPUT: &str = "sbom.json";

/// Options for generating an SBOM, one field per CLI flag.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Lock file or directory to scan; `None` scans the working directory
    pub input: Option<PathBuf>,

    /// Container image reference instead of a lock file
    pub image: Option<String>,

    /// Output format override
    pub format: Option<SbomFormat>,

    /// Spec version override
    pub spec_version: Option<String>,

    /// Output path override
    pub output: Option<PathBuf>,

    /// Skip post-generation validation
    pub no_validate: bool,

    /// Per-tool timeout override, in seconds
    pub timeout_secs: Option<u64>,

    /// Verbose mode
    pub verbose: bool,
}

/// A fully resolved generation run, ready to execute.
pub struct PreparedGenerate {
    request: GenerationRequest,
    registry: GeneratorRegistry,
    ctx: GenerateContext,
    cwd: PathBuf,
}

impl PreparedGenerate {
    /// The request this run will execute.
    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }
}

impl std::fmt::Debug for PreparedGenerate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedGenerate")
            .field("request", &self.request)
            .field("ctx", &self.ctx)
            .field("cwd", &self.cwd)
            .finish_non_exhaustive()
    }
}

/// Outcome of a generation run, ready for display.
pub struct GenerateOutcome {
    /// The orchestration result
    pub result: GenerationResult,

    /// Output path relative to the working directory, when produced
    pub display_path: Option<PathBuf>,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

/// Resolve flags, config, and the filesystem into a runnable request.
pub fn prepare(options: &GenerateOptions) -> Result<PreparedGenerate> {
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    prepare_in(options, &cwd)
}

/// Like [`prepare`], with an explicit working directory.
pub fn prepare_in(options: &GenerateOptions, cwd: &Path) -> Result<PreparedGenerate> {
    let config = config::load_default_config(cwd);

    let cache = Arc::new(ToolCache::new());
    config.tools.apply(&cache);

    let format = options
        .format
        .or_else(|| config.generate.format())
        .unwrap_or(SbomFormat::CycloneDx);
    let spec_version = options
        .spec_version
        .clone()
        .or_else(|| config.generate.spec_version.clone());
    let output = options
        .output
        .clone()
        .or_else(|| config.generate.output.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    let validate = if options.no_validate {
        false
    } else {
        config.generate.validate.unwrap_or(true)
    };

    let lock_file = match (&options.input, &options.image) {
        // Request construction reports the conflict; skip discovery.
        (Some(path), Some(_)) => Some(path.clone()),
        (Some(path), None) => Some(resolve_lock_file(path)?),
        (None, Some(_)) => None,
        (None, None) => Some(resolve_lock_file(cwd)?),
    };

    let request = GenerationRequest::from_options(lock_file, options.image.clone(), format, output)?
        .with_spec_version(spec_version)
        .with_validation(validate);

    let timeout = options
        .timeout_secs
        .map(Duration::from_secs)
        .or_else(|| config.generate.timeout());
    let mut ctx = GenerateContext::new().with_verbose(options.verbose);
    if let Some(timeout) = timeout {
        ctx = ctx.with_timeout(timeout);
    }

    tracing::debug!(
        "Resolved request: {} -> {} ({} {})",
        request.input_name(),
        request.output_path().display(),
        request.format(),
        request.spec_version().unwrap_or("default")
    );

    Ok(PreparedGenerate {
        request,
        registry: default_registry(cache),
        ctx,
        cwd: cwd.to_path_buf(),
    })
}

/// Execute a prepared run against the registry.
pub fn run(prepared: PreparedGenerate) -> GenerateOutcome {
    let start = Instant::now();

    let result = prepared.registry.generate(&prepared.request, &prepared.ctx);

    let display_path = result
        .output_path()
        .map(|path| fs::relative_path(&prepared.cwd, path));

    GenerateOutcome {
        result,
        display_path,
        duration: start.elapsed(),
    }
}

/// Resolve an input path to a concrete lock file.
///
/// A directory is searched for its best-ranked lock file; a file path is
/// taken as-is after an existence check. Which files count as lock files
/// is up to the discovery table, not this function.
fn resolve_lock_file(input: &Path) -> Result<PathBuf> {
    if input.is_dir() {
        return find_lock_file(input).ok_or_else(|| {
            NoLockFileError {
                dir: input.to_path_buf(),
            }
            .into()
        });
    }

    if !input.exists() {
        bail!("input path not found: {}", input.display());
    }

    Ok(input.to_path_buf())
}
