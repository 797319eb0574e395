//! `purser init` command
//!
//! Writes a starter project config with every key present but commented
//! out, so the file documents itself.

use anyhow::{Context, Result};

use crate::cli::InitArgs;
use crate::GlobalOptions;
use purser::util::diagnostic::ConfigExistsError;
use purser::util::{config, fs, Status};

const CONFIG_TEMPLATE: &str = r#"# Purser configuration.
#
# Everything here can be overridden on the command line. This project
# file wins over the global one (~/.purser/config.toml).

[generate]
# format = "cyclonedx"            # or "spdx"
# spec_version = "1.6"
# output = "sbom.json"
# timeout_secs = 1800
# validate = true

[tools]
# Absolute paths override PATH lookup per tool.
# trivy = "/usr/local/bin/trivy"
# syft = "/usr/local/bin/syft"
# cdxgen = "/usr/local/bin/cdxgen"
# cyclonedx-py = "/usr/local/bin/cyclonedx-py"
# cargo-cyclonedx = "/usr/local/bin/cargo-cyclonedx"
"#;

pub fn execute(args: InitArgs, global: &GlobalOptions) -> Result<()> {
    let shell = &global.shell;

    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let path = config::project_config_path(&cwd);

    if path.exists() {
        if !args.force {
            return Err(ConfigExistsError { path }.into());
        }
        shell.warn(format!("overwriting {}", path.display()));
    }

    fs::write_string(&path, CONFIG_TEMPLATE)?;

    shell.status(
        Status::Created,
        fs::relative_path(&cwd, &path).display().to_string(),
    );
    Ok(())
}
