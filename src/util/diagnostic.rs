//! User-friendly diagnostic messages.
//!
//! Every user-facing failure should name the root cause and at least one
//! concrete next step, usually another purser command to run.

use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when generation fails because tools are missing.
    pub const RUN_DOCTOR: &str =
        "Run `purser doctor` to check which generator tools are installed";

    /// Suggestion when no generator matches the request.
    pub const LIST_GENERATORS: &str =
        "Run `purser generators list` to see every generator and the formats it emits";

    /// Suggestion pointing at per-tool install instructions.
    pub const SHOW_GENERATOR: &str =
        "Run `purser generators show <name>` for install instructions";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
    Help,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
            Severity::Help => write!(f, "help"),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Warning,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = if color {
            match self.severity {
                Severity::Error => "\x1b[1;31merror\x1b[0m",
                Severity::Warning => "\x1b[1;33mwarning\x1b[0m",
                Severity::Note => "\x1b[1;36mnote\x1b[0m",
                Severity::Help => "\x1b[1;32mhelp\x1b[0m",
            }
        } else {
            match self.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
                Severity::Note => "note",
                Severity::Help => "help",
            }
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  -> {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            output.push('\n');
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// No recognized lock file in a scanned directory.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("no recognized lock file found under `{}`", dir.display())]
#[diagnostic(
    code(purser::generate::no_lock_file),
    help("Run `purser generators list` to see the lock file names purser recognizes, or pass one explicitly")
)]
pub struct NoLockFileError {
    pub dir: PathBuf,
}

/// A config file is already present and `--force` was not given.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("config file already exists at {}", path.display())]
#[diagnostic(code(purser::init::already_exists), help("Pass --force to overwrite it"))]
pub struct ConfigExistsError {
    pub path: PathBuf,
}

/// A document failed standalone validation.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("{} failed validation", path.display())]
#[diagnostic(code(purser::validate::invalid))]
pub struct ValidationFailedError {
    pub path: PathBuf,
    #[help]
    pub detail: Option<String>,
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

/// Print an error message with context and suggestions.
pub fn emit_error(message: &str, context: &[&str], suggestions: &[&str], color: bool) {
    let mut diag = Diagnostic::error(message);
    for ctx in context {
        diag = diag.with_context(*ctx);
    }
    for sug in suggestions {
        diag = diag.with_suggestion(*sug);
    }
    emit(&diag, color);
}
