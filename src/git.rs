//! Typed git operations over the command-runner seam.

use crate::command::{run_checked, run_logged, CommandRunner, OutputMode, RunRequest};
use crate::error::Result;
use crate::ui::Logger;
use crate::version::Version;

/// Git operations used by the release sequence.
///
/// Every operation is one external `git` invocation; `quiet` controls
/// whether mutating commands may write to the terminal. The runner is
/// shared with the non-git steps via [GitClient::runner].
pub struct GitClient<R> {
    runner: R,
    logger: Logger,
    quiet: bool,
}

fn git(args: &[&str]) -> RunRequest {
    RunRequest::new(std::iter::once("git").chain(args.iter().copied()))
}

impl<R: CommandRunner> GitClient<R> {
    pub fn new(runner: R, logger: Logger, quiet: bool) -> Self {
        GitClient {
            runner,
            logger,
            quiet,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn mutate_mode(&self) -> OutputMode {
        if self.quiet {
            OutputMode::Discard
        } else {
            OutputMode::Inherit
        }
    }

    pub fn current_branch(&self) -> Result<String> {
        let result = run_checked(
            &self.runner,
            &self.logger,
            &git(&["branch", "--show-current"]).with_output(OutputMode::Capture),
        )?;
        Ok(result.stdout.trim().to_string())
    }

    pub fn local_branches(&self) -> Result<Vec<String>> {
        let result = run_checked(
            &self.runner,
            &self.logger,
            &git(&["branch", "--format=%(refname:short)"]).with_output(OutputMode::Capture),
        )?;
        Ok(result
            .stdout
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect())
    }

    pub fn has_unstaged_changes(&self) -> Result<bool> {
        let result = run_logged(
            &self.runner,
            &self.logger,
            &git(&["diff", "--exit-code"]).with_output(self.mutate_mode()),
        )?;
        Ok(!result.success)
    }

    pub fn has_staged_changes(&self) -> Result<bool> {
        let result = run_logged(
            &self.runner,
            &self.logger,
            &git(&["diff-index", "--quiet", "--cached", "HEAD"]).with_output(OutputMode::Discard),
        )?;
        Ok(!result.success)
    }

    /// The highest released tag matching `<prefix>vMAJOR.MINOR.PATCH`.
    ///
    /// Tags are compared by their parsed version triple, so `v1.10.0`
    /// orders above `v1.9.0`.
    pub fn latest_release_tag(&self, tag_prefix: &str) -> Result<Option<String>> {
        let pattern = format!("{}v[0-9]*.[0-9]*.[0-9]*", tag_prefix);
        let result = run_checked(
            &self.runner,
            &self.logger,
            &git(&["tag", "-l", pattern.as_str()]).with_output(OutputMode::Capture),
        )?;

        let mut best: Option<((u32, u32, u32), String)> = None;
        for tag in result.stdout.lines().map(str::trim) {
            let Some(literal) = tag
                .strip_prefix(tag_prefix)
                .and_then(|rest| rest.strip_prefix('v'))
            else {
                continue;
            };
            let Ok(version) = Version::parse(literal) else {
                continue;
            };
            let key = (version.major, version.minor, version.patch);
            if best.as_ref().map_or(true, |(top, _)| key >= *top) {
                best = Some((key, tag.to_string()));
            }
        }
        Ok(best.map(|(_, tag)| tag))
    }

    /// Show the working-tree diff since `tag` on the terminal.
    ///
    /// Informational only; a failure here is tolerated.
    pub fn show_diff_since(&self, tag: &str) -> Result<()> {
        let range = format!("{}...", tag);
        run_logged(
            &self.runner,
            &self.logger,
            &git(&["--no-pager", "diff", range.as_str()]).with_output(OutputMode::Inherit),
        )?;
        Ok(())
    }

    pub fn stage(&self, paths: &[&str]) -> Result<()> {
        let mut args = vec!["add"];
        args.extend_from_slice(paths);
        run_checked(
            &self.runner,
            &self.logger,
            &git(&args).with_output(self.mutate_mode()),
        )?;
        Ok(())
    }

    pub fn commit(&self, message: &str) -> Result<()> {
        run_checked(
            &self.runner,
            &self.logger,
            &git(&["commit", "-m", message]).with_output(self.mutate_mode()),
        )?;
        Ok(())
    }

    pub fn create_annotated_tag(&self, tag: &str, message: &str) -> Result<()> {
        run_checked(
            &self.runner,
            &self.logger,
            &git(&["tag", "-a", tag, "-m", message]).with_output(self.mutate_mode()),
        )?;
        Ok(())
    }

    pub fn push(&self) -> Result<()> {
        run_checked(
            &self.runner,
            &self.logger,
            &git(&["push"]).with_output(self.mutate_mode()),
        )?;
        Ok(())
    }

    pub fn push_tags(&self) -> Result<()> {
        run_checked(
            &self.runner,
            &self.logger,
            &git(&["push", "--tags"]).with_output(self.mutate_mode()),
        )?;
        Ok(())
    }

    pub fn tag_exists(&self, tag: &str) -> Result<bool> {
        let result = run_logged(
            &self.runner,
            &self.logger,
            &git(&["rev-parse", tag]).with_output(OutputMode::Discard),
        )?;
        Ok(result.success)
    }

    pub fn reset_hard(&self, target: &str) -> Result<()> {
        run_checked(
            &self.runner,
            &self.logger,
            &git(&["reset", "--hard", target]).with_output(self.mutate_mode()),
        )?;
        Ok(())
    }

    pub fn delete_tag(&self, tag: &str) -> Result<()> {
        run_checked(
            &self.runner,
            &self.logger,
            &git(&["tag", "-d", tag]).with_output(self.mutate_mode()),
        )?;
        Ok(())
    }

    pub fn checkout_paths(&self, paths: &[&str]) -> Result<()> {
        let mut args = vec!["checkout", "--"];
        args.extend_from_slice(paths);
        run_checked(
            &self.runner,
            &self.logger,
            &git(&args).with_output(self.mutate_mode()),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::RecordingRunner;

    fn client(runner: RecordingRunner) -> GitClient<RecordingRunner> {
        GitClient::new(runner, Logger::new(false), true)
    }

    #[test]
    fn test_current_branch_trims_output() {
        let runner = RecordingRunner::new();
        runner.stub_output("git branch --show-current", "main\n");
        let git = client(runner);
        assert_eq!(git.current_branch().unwrap(), "main");
    }

    #[test]
    fn test_local_branches_splits_lines() {
        let runner = RecordingRunner::new();
        runner.stub_output("git branch --format=%(refname:short)", "feature\nmain\n");
        let git = client(runner);
        assert_eq!(git.local_branches().unwrap(), vec!["feature", "main"]);
    }

    #[test]
    fn test_latest_release_tag_orders_by_version_not_text() {
        let runner = RecordingRunner::new();
        runner.stub_output(
            "git tag -l v[0-9]*.[0-9]*.[0-9]*",
            "v1.10.0\nv1.2.0\nv1.9.0\n",
        );
        let git = client(runner);
        assert_eq!(git.latest_release_tag("").unwrap().as_deref(), Some("v1.10.0"));
    }

    #[test]
    fn test_latest_release_tag_respects_prefix() {
        let runner = RecordingRunner::new();
        runner.stub_output(
            "git tag -l gem-v[0-9]*.[0-9]*.[0-9]*",
            "gem-v0.2.0\ngem-v0.10.1\n",
        );
        let git = client(runner);
        assert_eq!(
            git.latest_release_tag("gem-").unwrap().as_deref(),
            Some("gem-v0.10.1")
        );
    }

    #[test]
    fn test_latest_release_tag_skips_unparseable_tags() {
        let runner = RecordingRunner::new();
        runner.stub_output("git tag -l v[0-9]*.[0-9]*.[0-9]*", "v1.2.x\nv1.1.0\n");
        let git = client(runner);
        assert_eq!(git.latest_release_tag("").unwrap().as_deref(), Some("v1.1.0"));
    }

    #[test]
    fn test_latest_release_tag_none_without_tags() {
        let runner = RecordingRunner::new();
        runner.stub_output("git tag -l v[0-9]*.[0-9]*.[0-9]*", "");
        let git = client(runner);
        assert_eq!(git.latest_release_tag("").unwrap(), None);
    }

    #[test]
    fn test_unstaged_changes_detected_from_exit_status() {
        let runner = RecordingRunner::new();
        runner.stub_failure("git diff --exit-code");
        let git = client(runner);
        assert!(git.has_unstaged_changes().unwrap());
    }

    #[test]
    fn test_tag_exists_tolerates_failure() {
        let runner = RecordingRunner::new();
        runner.stub_failure("git rev-parse v1.0.0");
        let git = client(runner);
        assert!(!git.tag_exists("v1.0.0").unwrap());
    }

    #[test]
    fn test_stage_and_checkout_render_paths() {
        let runner = RecordingRunner::new();
        let git = client(runner);
        git.stage(&["CHANGELOG.md", "Gemfile.lock", "lib/my_gem/version.rb"])
            .unwrap();
        git.checkout_paths(&["CHANGELOG.md"]).unwrap();

        assert!(git
            .runner()
            .ran("git add CHANGELOG.md Gemfile.lock lib/my_gem/version.rb"));
        assert!(git.runner().ran("git checkout -- CHANGELOG.md"));
    }
}
