//! `purser validate` command

use anyhow::Result;

use crate::cli::ValidateArgs;
use crate::GlobalOptions;
use purser::util::diagnostic::ValidationFailedError;
use purser::util::Status;
use purser::validate::{self, DetectedFormat, ValidationReport, ValidationStatus};

pub fn execute(args: ValidateArgs, global: &GlobalOptions) -> Result<()> {
    let shell = &global.shell;

    let (label, report) = match (&args.format, &args.spec_version) {
        (Some(format), Some(version)) => (
            format!("{} {}", format, version),
            validate::validate_file(&args.file, *format, version),
        ),
        _ => {
            let (detected, mut report) = validate::validate_file_auto(&args.file);
            let label = detected
                .as_ref()
                .map(|d| {
                    format!(
                        "{} {}",
                        d.format,
                        d.spec_version.as_deref().unwrap_or("unversioned")
                    )
                })
                .unwrap_or_else(|| "unknown format".to_string());

            // A partial -f / -s still has to hold against what the
            // document declares about itself.
            if report.is_passed() {
                if let Some(mismatch) = expectation_mismatch(&args, detected.as_ref()) {
                    report = ValidationReport::failed(vec![mismatch]);
                }
            }

            (label, report)
        }
    };

    match report.status() {
        ValidationStatus::Failed => {
            for message in report.messages() {
                shell.error(message);
            }
            Err(ValidationFailedError {
                path: args.file,
                detail: report.messages().first().cloned(),
            }
            .into())
        }
        ValidationStatus::Skipped => {
            shell.status(
                Status::Skipped,
                format!("{}: validation {}", args.file.display(), report.summary()),
            );
            Ok(())
        }
        ValidationStatus::Passed => {
            shell.status(
                Status::Validated,
                format!("{} conforms to {}", args.file.display(), label),
            );
            Ok(())
        }
    }
}

/// Check explicit format/version flags against the detected declaration.
fn expectation_mismatch(args: &ValidateArgs, detected: Option<&DetectedFormat>) -> Option<String> {
    let detected = detected?;

    if let Some(expected) = args.format {
        if expected != detected.format {
            return Some(format!(
                "expected {} but the document declares {}",
                expected, detected.format
            ));
        }
    }

    if let Some(expected) = &args.spec_version {
        if detected.spec_version.as_deref() != Some(expected.as_str()) {
            return Some(format!(
                "expected {} {} but the document declares {}",
                detected.format,
                expected,
                detected.spec_version.as_deref().unwrap_or("no version")
            ));
        }
    }

    None
}
