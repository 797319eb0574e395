//! Purser CLI - SBOM generation through whichever tool fits best

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use purser::util::Shell;

mod cli;
mod commands;

use cli::{Cli, Commands};

/// Global flags resolved once and passed to every command.
pub struct GlobalOptions {
    /// Output shell for status lines, spinners, and JSON events
    pub shell: Shell,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("purser=debug")
    } else if cli.quiet {
        EnvFilter::new("purser=warn")
    } else {
        EnvFilter::new("purser=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let global = GlobalOptions {
        shell: Shell::from_flags(cli.quiet, cli.verbose, cli.color, cli.json),
    };

    // Execute command
    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args, &global),
        Commands::Generators(args) => commands::generators::execute(args, &global),
        Commands::Validate(args) => commands::validate::execute(args, &global),
        Commands::Doctor => commands::doctor::execute(&global),
        Commands::Init(args) => commands::init::execute(args, &global),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
