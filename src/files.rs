//! Root-anchored file access for the version file and changelog.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Reads and writes release files relative to a fixed root, and discovers
/// them by name when their location is not configured.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find a file by name anywhere under the root.
    ///
    /// Directories are visited in sorted order so the result is
    /// deterministic; dot-directories (including `.git`) are skipped.
    /// Returns a path relative to the root.
    pub fn find(&self, file_name: &str) -> Option<PathBuf> {
        let found = walk(&self.root, file_name)?;
        found.strip_prefix(&self.root).ok().map(PathBuf::from)
    }

    pub fn read(&self, relative: &Path) -> Result<String> {
        Ok(fs::read_to_string(self.root.join(relative))?)
    }

    pub fn write(&self, relative: &Path, contents: &str) -> Result<()> {
        Ok(fs::write(self.root.join(relative), contents)?)
    }
}

fn walk(dir: &Path, file_name: &str) -> Option<PathBuf> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect();
    entries.sort();

    for path in &entries {
        if path.is_file() && path.file_name().is_some_and(|name| name == file_name) {
            return Some(path.clone());
        }
    }

    for path in &entries {
        let hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .map_or(true, |name| name.starts_with('.'));
        if path.is_dir() && !hidden {
            if let Some(found) = walk(path, file_name) {
                return Some(found);
            }
        }
    }

    None
}
