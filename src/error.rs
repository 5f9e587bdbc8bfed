use thiserror::Error;

/// Unified error type for release-assistant operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Invalid version format: {0}")]
    InvalidVersionFormat(String),

    #[error("You must be on the primary branch to release! (on '{current}', primary branch is '{primary}')")]
    WrongBranch { current: String, primary: String },

    #[error("Failed to automatically determine the primary branch. Specify it via the `primary_branch` option.")]
    PrimaryBranchUnknown,

    #[error("There are {0} changes!")]
    DirtyWorkingTree(String),

    #[error("Command failed: `{command}`")]
    CommandFailed { command: String },

    #[error("Could not locate {0} in the repository")]
    MissingFile(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-assistant
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a version-format error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::InvalidVersionFormat(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a failed-command error from the rendered command line
    pub fn command(command: impl Into<String>) -> Self {
        ReleaseError::CommandFailed {
            command: command.into(),
        }
    }

    /// Create a dirty-working-tree error ("unstaged" or "staged")
    pub fn dirty(kind: impl Into<String>) -> Self {
        ReleaseError::DirtyWorkingTree(kind.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReleaseError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReleaseError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_constructors() {
        assert!(ReleaseError::version("test")
            .to_string()
            .contains("Invalid version format"));
        assert!(ReleaseError::command("git push")
            .to_string()
            .contains("git push"));
    }

    #[test]
    fn test_dirty_working_tree_messages() {
        assert_eq!(
            ReleaseError::dirty("unstaged").to_string(),
            "There are unstaged changes!"
        );
        assert_eq!(
            ReleaseError::dirty("staged").to_string(),
            "There are staged changes!"
        );
    }

    #[test]
    fn test_wrong_branch_names_both_branches() {
        let err = ReleaseError::WrongBranch {
            current: "feature".to_string(),
            primary: "main".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("feature"));
        assert!(msg.contains("main"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ReleaseError::config("x"), "Configuration error"),
            (ReleaseError::version("x"), "Invalid version format"),
            (ReleaseError::command("x"), "Command failed"),
            (
                ReleaseError::MissingFile("version.rb".into()),
                "Could not locate",
            ),
            (ReleaseError::PrimaryBranchUnknown, "Failed to automatically"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
