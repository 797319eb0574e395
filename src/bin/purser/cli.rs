//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use purser::generator::SbomFormat;
use purser::util::shell::ColorChoice;

/// Purser - SBOM generation through whichever tool fits best
#[derive(Parser)]
#[command(name = "purser")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress status output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// When to use colored output
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    /// Emit machine-readable JSON events instead of status lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate an SBOM from a lock file, a directory, or a container image
    Generate(GenerateArgs),

    /// Inspect the registered generators
    Generators(GeneratorsArgs),

    /// Validate an existing SBOM document
    Validate(ValidateArgs),

    /// Check which generation tools are installed
    Doctor,

    /// Write a starter config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Lock file or directory to scan (defaults to the current directory)
    pub input: Option<PathBuf>,

    /// Container image reference to scan instead of a lock file
    #[arg(long, value_name = "IMAGE")]
    pub image: Option<String>,

    /// Output format
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<SbomFormat>,

    /// Spec version to emit (defaults to each generator's default)
    #[arg(short = 's', long, value_name = "VERSION")]
    pub spec_version: Option<String>,

    /// Output file
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Skip validating the generated document
    #[arg(long)]
    pub no_validate: bool,

    /// Per-tool timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(Args)]
pub struct GeneratorsArgs {
    #[command(subcommand)]
    pub command: Option<GeneratorsCommands>,
}

#[derive(Subcommand)]
pub enum GeneratorsCommands {
    /// List every generator with its formats and availability
    List,

    /// Show one generator in detail
    Show(GeneratorsShowArgs),

    /// Probe each tool for its path and version
    Check,
}

#[derive(Args)]
pub struct GeneratorsShowArgs {
    /// Generator name (e.g. trivy-fs, syft-image)
    pub name: String,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// SBOM file to validate
    pub file: PathBuf,

    /// Expected format (autodetected when omitted)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<SbomFormat>,

    /// Expected spec version (autodetected when omitted)
    #[arg(short = 's', long, value_name = "VERSION")]
    pub spec_version: Option<String>,
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
