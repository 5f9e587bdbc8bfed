//! Package-manager steps of the release sequence.

use crate::command::{run_checked, CommandRunner, OutputMode, RunRequest};
use crate::error::Result;
use crate::ui::Logger;

/// Lockfile staged alongside the changelog and version file
pub const LOCKFILE: &str = "Gemfile.lock";

/// Refresh the lockfile so it reflects the new version before commit.
pub fn install<R: CommandRunner>(runner: &R, logger: &Logger, quiet: bool) -> Result<()> {
    let output = if quiet {
        OutputMode::Discard
    } else {
        OutputMode::Inherit
    };
    run_checked(
        runner,
        logger,
        &RunRequest::new(["bundle", "install"]).with_output(output),
    )?;
    Ok(())
}

/// Publish the package to the registry.
///
/// Output is never suppressed: the registry may require a second factor,
/// and the user has to see that prompt.
pub fn publish_release<R: CommandRunner>(runner: &R, logger: &Logger) -> Result<()> {
    run_checked(
        runner,
        logger,
        &RunRequest::new(["bundle", "exec", "rake", "release"]).with_output(OutputMode::Inherit),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::RecordingRunner;

    #[test]
    fn test_install_runs_bundle_install() {
        let runner = RecordingRunner::new();
        install(&runner, &Logger::new(false), true).unwrap();
        assert!(runner.ran("bundle install"));
    }

    #[test]
    fn test_install_surfaces_failure() {
        let runner = RecordingRunner::new();
        runner.stub_failure("bundle install");
        assert!(install(&runner, &Logger::new(false), true).is_err());
    }

    #[test]
    fn test_publish_release_runs_rake_release() {
        let runner = RecordingRunner::new();
        publish_release(&runner, &Logger::new(false)).unwrap();
        assert!(runner.ran("bundle exec rake release"));
    }
}
