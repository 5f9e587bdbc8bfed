//! The release sequence and its rollback path.
//!
//! One [ReleaseAssistant] run moves linearly through the release steps:
//! verify the branch, print the plan, confirm, check cleanliness, update
//! the changelog and version file, refresh the lockfile, commit, tag,
//! push, and run the post-release hook. Any error at or after the
//! confirmation routes through [ReleaseAssistant::rollback]; errors before
//! it propagate directly because nothing has been mutated yet.

use std::path::PathBuf;

use chrono::Local;
use console::style;

use crate::bundler;
use crate::changelog;
use crate::command::CommandRunner;
use crate::config::ReleaseOptions;
use crate::error::{ReleaseError, Result};
use crate::files::FileStore;
use crate::git::GitClient;
use crate::hooks::PostReleaseHook;
use crate::ui::{Confirmation, Logger, Prompter};
use crate::version::{self, Version};

/// Branch names tried when `primary_branch` is not configured
pub const CONVENTIONAL_PRIMARY_BRANCHES: &[&str] = &["main", "master", "trunk"];

const VERSION_FILE_NAME: &str = "version.rb";
const CHANGELOG_FILE_NAME: &str = "CHANGELOG.md";

/// How a release run ended; both variants exit with status 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Released,
    /// The user declined the confirmation; the repository was restored
    Aborted,
}

/// Everything a release run derives up front, resolved once and owned by
/// exactly one run.
#[derive(Debug, Clone)]
pub struct ReleaseContext {
    pub primary_branch: String,
    pub version_file: PathBuf,
    pub changelog: PathBuf,
    pub current_version: Version,
    pub next_version: Version,
    pub next_tag: String,
    pub latest_tag: Option<String>,
}

/// Sequences one release run against its collaborators.
pub struct ReleaseAssistant<R: CommandRunner, P: Prompter> {
    options: ReleaseOptions,
    logger: Logger,
    git: GitClient<R>,
    prompter: P,
    files: FileStore,
}

impl<R: CommandRunner, P: Prompter> ReleaseAssistant<R, P> {
    pub fn new(
        options: ReleaseOptions,
        logger: Logger,
        runner: R,
        prompter: P,
        root: PathBuf,
    ) -> Self {
        let quiet = !options.show_command_output;
        ReleaseAssistant {
            git: GitClient::new(runner, logger, quiet),
            files: FileStore::new(root),
            options,
            logger,
            prompter,
        }
    }

    /// The git client (and through it, the command runner) driving this run
    pub fn git(&self) -> &GitClient<R> {
        &self.git
    }

    /// Run the full release sequence.
    ///
    /// `Ok(Released)` and `Ok(Aborted)` both mean a clean exit; an `Err`
    /// means the run failed after rollback already restored the
    /// repository (or, before confirmation, that nothing was touched).
    pub fn run(&self) -> Result<Outcome> {
        let context = self.prepare()?;
        self.print_plan(&context)?;

        if !self.confirm(&context)? {
            return Ok(Outcome::Aborted);
        }

        match self.execute(&context) {
            Ok(()) => {
                self.logger.info(format!(
                    "{} Released v{} (tag: {}).",
                    style("✓").green(),
                    context.next_version,
                    context.next_tag
                ));
                Ok(Outcome::Released)
            }
            Err(error) => {
                self.rollback(&context);
                Err(error)
            }
        }
    }

    /// Resolve everything the run needs, in one explicit phase.
    fn prepare(&self) -> Result<ReleaseContext> {
        let current_branch = self.git.current_branch()?;
        let primary_branch = self.primary_branch()?;
        if current_branch != primary_branch {
            return Err(ReleaseError::WrongBranch {
                current: current_branch,
                primary: primary_branch,
            });
        }

        let version_file = self
            .files
            .find(VERSION_FILE_NAME)
            .ok_or_else(|| ReleaseError::MissingFile(VERSION_FILE_NAME.to_string()))?;
        let changelog = self
            .files
            .find(CHANGELOG_FILE_NAME)
            .ok_or_else(|| ReleaseError::MissingFile(CHANGELOG_FILE_NAME.to_string()))?;

        let source = self.files.read(&version_file)?;
        let literal = version::find_version_literal(&source).ok_or_else(|| {
            ReleaseError::version(format!(
                "no VERSION assignment found in {}",
                version_file.display()
            ))
        })?;
        let current_version = Version::parse(literal)?;
        let next_version = current_version.increment(self.options.release_type);
        let next_tag = format!("{}v{}", self.options.tag_prefix, next_version);
        let latest_tag = self.git.latest_release_tag(&self.options.tag_prefix)?;

        Ok(ReleaseContext {
            primary_branch,
            version_file,
            changelog,
            current_version,
            next_version,
            next_tag,
            latest_tag,
        })
    }

    fn primary_branch(&self) -> Result<String> {
        if let Some(branch) = &self.options.primary_branch {
            return Ok(branch.clone());
        }
        let branches = self.git.local_branches()?;
        branches
            .into_iter()
            .find(|branch| CONVENTIONAL_PRIMARY_BRANCHES.contains(&branch.as_str()))
            .ok_or(ReleaseError::PrimaryBranchUnknown)
    }

    /// Informational only; no mutation happens here.
    fn print_plan(&self, context: &ReleaseContext) -> Result<()> {
        self.logger.info(format!(
            "You are running the release process with options {:?}.",
            self.options
        ));
        self.logger.debug(format!(
            "Version file {} is at {}",
            context.version_file.display(),
            context.current_version
        ));

        let released = context
            .latest_tag
            .as_deref()
            .map(|tag| released_version_from_tag(tag, &self.options.tag_prefix).to_string())
            .unwrap_or_else(|| "[none]".to_string());
        self.logger.info(format!(
            "Current released version is {} (tag: {}).",
            style(&released).blue(),
            context.latest_tag.as_deref().unwrap_or("[none]")
        ));
        self.logger.info(format!(
            "Next version will be {} (tag: {}).",
            style(context.next_version.to_string()).green(),
            context.next_tag
        ));

        self.logger
            .info("Changelog content for this upcoming release:");
        match changelog::unreleased_section(&self.files.read(&context.changelog)?) {
            Some(section) => println!("{}", section),
            None => self.logger.info("[no unreleased section found]"),
        }

        if let Some(tag) = &context.latest_tag {
            self.logger.info("Diff since the last release:");
            self.git.show_diff_since(tag)?;
        }

        Ok(())
    }

    /// Block for a single-key answer; re-prompts on unrecognized keys.
    ///
    /// Returns false after a decline, with the repository already rolled
    /// back.
    fn confirm(&self, context: &ReleaseContext) -> Result<bool> {
        loop {
            self.logger.info("Does that look good? [y]n");
            match self.prompter.confirm()? {
                Confirmation::Yes => return Ok(true),
                Confirmation::No => {
                    self.logger.info("Okay, aborting.");
                    self.rollback(context);
                    return Ok(false);
                }
                Confirmation::Undecided => self.logger.info("That's not an option."),
            }
        }
    }

    fn execute(&self, context: &ReleaseContext) -> Result<()> {
        self.ensure_clean()?;
        self.update_changelog(context)?;
        self.update_version_file(context)?;
        bundler::install(self.git.runner(), &self.logger, self.quiet())?;
        self.commit_release_files(context)?;
        self.git.create_annotated_tag(
            &context.next_tag,
            &format!("Version {}", context.next_version),
        )?;

        if self.options.push_to_registry {
            self.logger.debug("Pushing to the package registry");
            bundler::publish_release(self.git.runner(), &self.logger)?;
        }
        self.logger.debug("Pushing to the git remote");
        self.git.push()?;
        self.git.push_tags()?;

        if let Some(query) = &self.options.post_release_query {
            PostReleaseHook::new(query.as_str()).run(
                self.git.runner(),
                &self.logger,
                self.quiet(),
            )?;
        }

        Ok(())
    }

    /// Runs before any file mutation so rollback has a clean baseline.
    fn ensure_clean(&self) -> Result<()> {
        if self.git.has_unstaged_changes()? {
            return Err(ReleaseError::dirty("unstaged"));
        }
        if self.git.has_staged_changes()? {
            return Err(ReleaseError::dirty("staged"));
        }
        Ok(())
    }

    fn update_changelog(&self, context: &ReleaseContext) -> Result<()> {
        let contents = self.files.read(&context.changelog)?;
        let rewritten = changelog::rewrite_for_release(
            &contents,
            &context.next_version,
            Local::now().date_naive(),
        );
        self.files.write(&context.changelog, &rewritten)
    }

    fn update_version_file(&self, context: &ReleaseContext) -> Result<()> {
        let contents = self.files.read(&context.version_file)?;
        let rewritten = version::replace_version_literal(&contents, &context.next_version)
            .ok_or_else(|| {
                ReleaseError::version(format!(
                    "no VERSION assignment found in {}",
                    context.version_file.display()
                ))
            })?;
        self.files.write(&context.version_file, &rewritten)
    }

    fn commit_release_files(&self, context: &ReleaseContext) -> Result<()> {
        let changelog = context.changelog.display().to_string();
        let version_file = context.version_file.display().to_string();
        self.git
            .stage(&[&changelog, bundler::LOCKFILE, &version_file])?;
        self.git
            .commit(&format!("Prepare to release v{}", context.next_version))
    }

    /// Best-effort restoration after a failed or aborted run.
    ///
    /// Each step is independently guarded by a pre-check, so this is safe
    /// to invoke from any point after confirmation, including before any
    /// mutation happened. A failing step is a warning; the remaining
    /// steps still run.
    pub fn rollback(&self, context: &ReleaseContext) {
        self.logger.debug("Restoring repository state");

        match self.git.current_branch() {
            Ok(branch) if branch == context.primary_branch => {
                let target = format!("origin/{}", context.primary_branch);
                if let Err(error) = self.git.reset_hard(&target) {
                    self.logger
                        .warn(format!("Could not reset to {}: {}", target, error));
                }
            }
            Ok(_) => {}
            Err(error) => self
                .logger
                .warn(format!("Could not determine current branch: {}", error)),
        }

        match self.git.tag_exists(&context.next_tag) {
            Ok(true) => {
                if let Err(error) = self.git.delete_tag(&context.next_tag) {
                    self.logger.warn(format!(
                        "Could not delete tag {}: {}",
                        context.next_tag, error
                    ));
                }
            }
            Ok(false) => {}
            Err(error) => self
                .logger
                .warn(format!("Could not check tag {}: {}", context.next_tag, error)),
        }

        match self.git.has_unstaged_changes() {
            Ok(true) => {
                let changelog = context.changelog.display().to_string();
                let version_file = context.version_file.display().to_string();
                if let Err(error) =
                    self.git
                        .checkout_paths(&[&changelog, bundler::LOCKFILE, &version_file])
                {
                    self.logger
                        .warn(format!("Could not restore release files: {}", error));
                }
            }
            Ok(false) => {}
            Err(error) => self
                .logger
                .warn(format!("Could not inspect working tree: {}", error)),
        }
    }

    fn quiet(&self) -> bool {
        !self.options.show_command_output
    }
}

fn released_version_from_tag<'a>(tag: &'a str, tag_prefix: &str) -> &'a str {
    tag.strip_prefix(tag_prefix)
        .unwrap_or(tag)
        .trim_start_matches('v')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_released_version_from_tag() {
        assert_eq!(released_version_from_tag("v1.2.3", ""), "1.2.3");
        assert_eq!(released_version_from_tag("gem-v1.2.3", "gem-"), "1.2.3");
        assert_eq!(released_version_from_tag("odd-tag", ""), "odd-tag");
    }

    #[test]
    fn test_conventional_primary_branches() {
        assert_eq!(
            CONVENTIONAL_PRIMARY_BRANCHES,
            &["main", "master", "trunk"][..]
        );
    }
}
