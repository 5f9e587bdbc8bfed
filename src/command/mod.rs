//! External command execution abstraction
//!
//! All work against the outside world (git, bundler, user hooks) goes
//! through the [CommandRunner] trait, so the release sequence can be driven
//! against a real process runner or a deterministic recording fake:
//!
//! - [system::SystemRunner]: real implementation over `std::process::Command`
//! - [recording::RecordingRunner]: scripted implementation for testing
//!
//! A runner only fails when a process cannot be spawned; a command exiting
//! non-zero is a normal [RunResult] with `success == false`, so each call
//! site decides whether failure is tolerated.

pub mod recording;
pub mod system;

pub use recording::RecordingRunner;
pub use system::SystemRunner;

use std::fmt;

use crate::error::{ReleaseError, Result};
use crate::ui::Logger;

/// What happens to a command's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Capture stdout for the caller (trailing whitespace trimmed)
    Capture,
    /// Let the command write to the terminal (interactive commands)
    Inherit,
    /// Silence stdout and stderr
    Discard,
}

/// One external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub argv: Vec<String>,
    pub output: OutputMode,
    pub clear_env_prefixes: Vec<String>,
}

impl RunRequest {
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RunRequest {
            argv: argv.into_iter().map(Into::into).collect(),
            output: OutputMode::Discard,
            clear_env_prefixes: Vec::new(),
        }
    }

    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    /// Remove every environment variable starting with one of `prefixes`
    /// from the child's environment.
    pub fn clearing_env_prefixes(mut self, prefixes: &[&str]) -> Self {
        self.clear_env_prefixes = prefixes.iter().map(|p| p.to_string()).collect();
        self
    }
}

impl fmt::Display for RunRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv.join(" "))
    }
}

/// Outcome of one external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub success: bool,
    /// Captured stdout; empty unless the request used [OutputMode::Capture]
    pub stdout: String,
}

/// Common command execution trait for abstraction
pub trait CommandRunner {
    /// Execute one command.
    ///
    /// `Err` only when the process could not be spawned; a non-zero exit
    /// status is `Ok` with `success == false`.
    fn run(&self, request: &RunRequest) -> Result<RunResult>;
}

/// Run a command, tracing it at debug level first.
pub fn run_logged<R: CommandRunner>(
    runner: &R,
    logger: &Logger,
    request: &RunRequest,
) -> Result<RunResult> {
    logger.debug(format!("Running system command `{}`", request));
    runner.run(request)
}

/// Run a command whose failure is not tolerated.
pub fn run_checked<R: CommandRunner>(
    runner: &R,
    logger: &Logger,
    request: &RunRequest,
) -> Result<RunResult> {
    let result = run_logged(runner, logger, request)?;
    if !result.success {
        return Err(ReleaseError::command(request.to_string()));
    }
    Ok(result)
}
