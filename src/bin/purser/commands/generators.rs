//! `purser generators` command
//!
//! Registry introspection: what is registered, what each generator can
//! emit, and which of the backing tools are actually installed.

use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::cli::{GeneratorsArgs, GeneratorsCommands, GeneratorsShowArgs};
use crate::GlobalOptions;
use purser::generator::{default_registry, GeneratorRegistry, GeneratorSummary};
use purser::tools::version::detect_tool_version;
use purser::tools::{catalog, ToolCache};
use purser::util::config;
use purser::util::Status;

pub fn execute(args: GeneratorsArgs, global: &GlobalOptions) -> Result<()> {
    match args.command {
        None | Some(GeneratorsCommands::List) => list(),
        Some(GeneratorsCommands::Show(args)) => show(args),
        Some(GeneratorsCommands::Check) => check(global),
    }
}

/// Build the default registry with config tool overrides applied.
fn build_registry() -> Result<GeneratorRegistry> {
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let config = config::load_default_config(&cwd);

    let cache = Arc::new(ToolCache::new());
    config.tools.apply(&cache);

    Ok(default_registry(cache))
}

fn list() -> Result<()> {
    let registry = build_registry()?;

    for summary in registry.list_all() {
        let availability = if summary.available {
            "installed"
        } else {
            "missing"
        };
        println!(
            "{:<16} priority {:<4} {:<10} via {}",
            summary.name,
            summary.priority,
            availability,
            summary.tool.command()
        );
        for capability in &summary.capabilities {
            println!(
                "    {}: {} (default {})",
                capability.format(),
                capability.versions().join(", "),
                capability.default_version()
            );
        }
    }

    Ok(())
}

fn show(args: GeneratorsShowArgs) -> Result<()> {
    let registry = build_registry()?;

    let Some(generator) = registry.find(&args.name) else {
        let summaries = registry.list_all();
        let names: Vec<&str> = summaries.iter().map(|s| s.name).collect();
        bail!(
            "no generator named `{}` (known: {})",
            args.name,
            names.join(", ")
        );
    };

    let summary = GeneratorSummary::from_generator(generator, registry.tool_cache());
    let info = catalog::info(summary.tool);

    println!("{}", summary.name);
    println!("  Tool:      {} ({})", info.display_name, info.description);
    println!("  Priority:  {}", summary.priority);
    for capability in &summary.capabilities {
        println!(
            "  Emits:     {} {} (default {})",
            capability.format(),
            capability.versions().join(", "),
            capability.default_version()
        );
    }
    for purpose in info.required_for {
        println!("  Used for:  {}", purpose);
    }

    match registry.tool_cache().path(summary.tool) {
        Some(path) => println!("  Installed: {}", path.display()),
        None => {
            println!("  Installed: no");
            for line in info.install_lines {
                println!("    {}", line);
            }
            println!("  Homepage:  {}", info.homepage);
        }
    }

    Ok(())
}

fn check(global: &GlobalOptions) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let config = config::load_default_config(&cwd);

    let cache = ToolCache::new();
    config.tools.apply(&cache);

    global.shell.status(Status::Checking, "installed SBOM tools");

    for info in catalog::all() {
        match cache.path(info.tool) {
            Some(path) => {
                let version = detect_tool_version(&path)
                    .map(|v| v.to_string())
                    .unwrap_or_else(|_| "unknown".to_string());
                println!("{:<16} {:<10} {}", info.display_name, version, path.display());
            }
            None => {
                println!("{:<16} not installed", info.display_name);
            }
        }
    }

    Ok(())
}
