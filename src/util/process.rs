//! Subprocess execution utilities.
//!
//! External SBOM tools can churn for minutes on a large project, so
//! commands run under a wall-clock deadline: the child is spawned with
//! piped output, polled until it exits, and killed once the deadline
//! passes. A progress line is logged periodically so long scans do not
//! look hung.

use std::ffi::OsStr;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

/// Poll cadence while waiting on a running child.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Interval between progress log lines for long-running commands.
pub const PROGRESS_INTERVAL: Duration = Duration::from_secs(60);

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

/// What became of a command run under a deadline.
#[derive(Debug)]
pub enum ExecOutcome {
    /// The command exited, successfully or not, before the deadline.
    Completed(Output),

    /// The deadline passed and the command was killed.
    TimedOut {
        /// Wall-clock time spent before the kill
        elapsed: Duration,
    },
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get the working directory, if one was set.
    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// The program's bare file name, for log lines.
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }

    /// Display the command for logs and error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute the command and wait for completion, without a deadline.
    ///
    /// Suited to quick probes like `--version`; anything that scans a
    /// project should go through [`exec_with_timeout`].
    ///
    /// [`exec_with_timeout`]: ProcessBuilder::exec_with_timeout
    pub fn exec(&self) -> Result<Output> {
        let output = self
            .build_command()
            .output()
            .with_context(|| format!("failed to run `{}`", self.program.display()))?;

        Ok(output)
    }

    /// Execute under a wall-clock deadline, logging progress while waiting.
    ///
    /// A completed run is returned whatever its exit status; only failure
    /// to spawn surfaces as an error. On timeout the child is killed and
    /// reaped before returning.
    pub fn exec_with_timeout(&self, timeout: Duration) -> Result<ExecOutcome> {
        match &self.cwd {
            Some(cwd) => tracing::info!(
                "Running command: {} (cwd: {})",
                self.display_command(),
                cwd.display()
            ),
            None => tracing::info!("Running command: {}", self.display_command()),
        }

        let mut cmd = self.build_command();
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))?;

        // Both pipes are drained off-thread; a chatty tool would otherwise
        // fill the pipe buffer and never exit.
        let stdout = spawn_reader(child.stdout.take());
        let stderr = spawn_reader(child.stderr.take());

        let name = self.program_name();
        let start = Instant::now();
        let mut next_progress = PROGRESS_INTERVAL;

        let status = loop {
            if let Some(status) = child
                .try_wait()
                .with_context(|| format!("failed to wait for `{}`", self.program.display()))?
            {
                break status;
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                kill_and_reap(&mut child);
                join_reader(stdout);
                join_reader(stderr);
                return Ok(ExecOutcome::TimedOut { elapsed });
            }

            if elapsed >= next_progress {
                tracing::info!(
                    "{} still running... ({}m {}s elapsed, timeout: {}m)",
                    name,
                    elapsed.as_secs() / 60,
                    elapsed.as_secs() % 60,
                    timeout.as_secs() / 60
                );
                next_progress += PROGRESS_INTERVAL;
            }

            std::thread::sleep(POLL_INTERVAL);
        };

        let stdout = join_reader(stdout);
        let stderr = join_reader(stderr);

        Ok(ExecOutcome::Completed(Output {
            status,
            stdout,
            stderr,
        }))
    }
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buffer);
        }
        buffer
    })
}

fn join_reader(handle: JoinHandle<Vec<u8>>) -> Vec<u8> {
    handle.join().unwrap_or_default()
}

fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
