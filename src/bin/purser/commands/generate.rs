//! `purser generate` command

use anyhow::Result;

use crate::cli::GenerateArgs;
use crate::GlobalOptions;
use purser::ops::{self, GenerateOptions, GenerateOutcome};
use purser::util::diagnostic::{self, suggestions, Diagnostic};
use purser::util::shell::format_duration;
use purser::util::{Shell, Status};

pub fn execute(args: GenerateArgs, global: &GlobalOptions) -> Result<()> {
    let shell = &global.shell;

    let options = GenerateOptions {
        input: args.input,
        image: args.image,
        format: args.format,
        spec_version: args.spec_version,
        output: args.output,
        no_validate: args.no_validate,
        timeout_secs: args.timeout,
        verbose: shell.is_verbose(),
    };

    let prepared = ops::prepare(&options)?;
    let input_name = prepared.request().input_name();
    let format = prepared.request().format();

    shell.status(
        Status::Generating,
        format!("{} SBOM for {}", format, input_name),
    );

    let spinner = shell.spinner(format!("Scanning {}", input_name));
    let outcome = ops::run(prepared);
    spinner.finish();

    if shell.is_json() {
        return finish_json(shell, &outcome);
    }

    if outcome.result.is_success() {
        print_success(shell, &outcome);
        Ok(())
    } else {
        print_failure(shell, &input_name, &outcome);
        std::process::exit(1);
    }
}

fn print_success(shell: &Shell, outcome: &GenerateOutcome) {
    let result = &outcome.result;
    let path = outcome
        .display_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    shell.status(
        Status::Generated,
        format!(
            "{} {} with {} ({})",
            result.format(),
            result.spec_version(),
            result.generator_name(),
            path
        ),
    );

    match result.validation() {
        Some(report) if report.is_failed() => {
            let mut diag =
                Diagnostic::warning("generated document failed validation").with_location(&path);
            for message in report.messages() {
                diag = diag.with_context(message);
            }
            diagnostic::emit(&diag, shell.use_color());
        }
        Some(report) if report.is_skipped() => {
            shell.status(Status::Skipped, format!("validation {}", report.summary()));
        }
        Some(_) => {
            shell.status(
                Status::Validated,
                format!(
                    "{} conforms to {} {}",
                    path,
                    result.format(),
                    result.spec_version()
                ),
            );
        }
        None => {}
    }

    shell.status(
        Status::Finished,
        format!("in {}", format_duration(outcome.duration)),
    );
}

fn print_failure(shell: &Shell, input_name: &str, outcome: &GenerateOutcome) {
    let error = outcome.result.error().unwrap_or("unknown error");

    let mut diag = Diagnostic::error(format!("SBOM generation failed for {}", input_name));
    for line in error.lines() {
        diag = diag.with_context(line);
    }
    diag = diag
        .with_suggestion(suggestions::RUN_DOCTOR)
        .with_suggestion(suggestions::LIST_GENERATORS)
        .with_suggestion(suggestions::SHOW_GENERATOR);

    diagnostic::emit(&diag, shell.use_color());
}

fn finish_json(shell: &Shell, outcome: &GenerateOutcome) -> Result<()> {
    let result = &outcome.result;
    let event = serde_json::json!({
        "reason": "generate-finished",
        "success": result.is_success(),
        "generator": result.generator_name(),
        "format": result.format(),
        "spec_version": result.spec_version(),
        "output": result.output_path().map(|p| p.display().to_string()),
        "error": result.error(),
        "validation": result.validation().map(|r| r.summary()),
    });
    shell.json_event(&event);

    if result.is_success() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}
