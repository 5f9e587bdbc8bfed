use std::env;
use std::process::{Command, Stdio};

use crate::command::{CommandRunner, OutputMode, RunRequest, RunResult};
use crate::error::{ReleaseError, Result};

/// Real command runner over `std::process::Command`.
///
/// Commands run blocking, in sequence, inheriting the current working
/// directory. Captured stdout is trimmed of trailing whitespace.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        SystemRunner
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, request: &RunRequest) -> Result<RunResult> {
        let (program, args) = request
            .argv
            .split_first()
            .ok_or_else(|| ReleaseError::config("empty command"))?;

        let mut command = Command::new(program);
        command.args(args);

        if !request.clear_env_prefixes.is_empty() {
            for (key, _) in env::vars_os().filter_map(|(k, v)| Some((k.into_string().ok()?, v))) {
                if request
                    .clear_env_prefixes
                    .iter()
                    .any(|prefix| key.starts_with(prefix))
                {
                    command.env_remove(&key);
                }
            }
        }

        let result = match request.output {
            OutputMode::Capture => {
                let output = command.output()?;
                RunResult {
                    success: output.status.success(),
                    stdout: String::from_utf8_lossy(&output.stdout)
                        .trim_end()
                        .to_string(),
                }
            }
            OutputMode::Inherit => {
                let status = command.status()?;
                RunResult {
                    success: status.success(),
                    stdout: String::new(),
                }
            }
            OutputMode::Discard => {
                command.stdout(Stdio::null()).stderr(Stdio::null());
                let status = command.status()?;
                RunResult {
                    success: status.success(),
                    stdout: String::new(),
                }
            }
        };

        Ok(result)
    }
}
