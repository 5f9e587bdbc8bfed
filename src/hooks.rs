//! Post-release follow-up command execution.

use crate::command::{run_checked, run_logged, CommandRunner, OutputMode, RunRequest};
use crate::error::Result;
use crate::ui::Logger;

/// Environment prefixes stripped from the follow-up command so the release
/// toolchain does not leak into an unrelated command
pub const CLEARED_ENV_PREFIXES: [&str; 2] = ["BUNDLE", "RUBY"];

/// User-defined follow-up to a successful release.
///
/// The configured query command is run through the shell; when it exits 0
/// with non-empty stdout, that stdout is executed as the follow-up command.
/// A query that fails or prints nothing means there is nothing to run.
pub struct PostReleaseHook {
    query: String,
}

impl PostReleaseHook {
    pub fn new(query: impl Into<String>) -> Self {
        PostReleaseHook {
            query: query.into(),
        }
    }

    pub fn run<R: CommandRunner>(&self, runner: &R, logger: &Logger, quiet: bool) -> Result<()> {
        let probe =
            RunRequest::new(["sh", "-c", self.query.as_str()]).with_output(OutputMode::Capture);
        let result = run_logged(runner, logger, &probe)?;
        if !result.success {
            logger.debug("No post-release command configured");
            return Ok(());
        }

        let command = result.stdout.trim();
        if command.is_empty() {
            logger.debug("Post-release query returned nothing to run");
            return Ok(());
        }

        let output = if quiet {
            OutputMode::Discard
        } else {
            OutputMode::Inherit
        };
        run_checked(
            runner,
            logger,
            &RunRequest::new(["sh", "-c", command])
                .with_output(output)
                .clearing_env_prefixes(&CLEARED_ENV_PREFIXES),
        )?;
        Ok(())
    }
}
