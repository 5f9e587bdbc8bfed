use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::{ReleaseError, Result};

/// Which version component a release run is intended to bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    Major,
    Minor,
    Patch,
}

impl FromStr for ReleaseType {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "major" => Ok(ReleaseType::Major),
            "minor" => Ok(ReleaseType::Minor),
            "patch" => Ok(ReleaseType::Patch),
            other => Err(ReleaseError::config(format!(
                "unknown release type '{}' - expected major, minor, or patch",
                other
            ))),
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseType::Major => write!(f, "major"),
            ReleaseType::Minor => write!(f, "minor"),
            ReleaseType::Patch => write!(f, "patch"),
        }
    }
}

/// Semantic version with an optional trailing modifier.
///
/// A non-empty modifier (e.g. `1.2.0.alpha`) marks the version as a
/// prerelease of the corresponding release version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub modifier: Option<String>,
}

impl Version {
    /// Create a release version (no modifier)
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
            modifier: None,
        }
    }

    /// Parse a version from a string like `1.2.3` or `1.2.3.alpha`.
    ///
    /// The first three dot-separated components must be non-negative
    /// integers; anything after the third dot becomes the modifier.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let parts: Vec<&str> = input.split('.').collect();
        if parts.len() < 3 {
            return Err(ReleaseError::version(format!(
                "'{}' - expected MAJOR.MINOR.PATCH",
                input
            )));
        }

        let component = |index: usize, name: &str| -> Result<u32> {
            parts[index].parse::<u32>().map_err(|_| {
                ReleaseError::version(format!("invalid {} component: '{}'", name, parts[index]))
            })
        };
        let major = component(0, "major")?;
        let minor = component(1, "minor")?;
        let patch = component(2, "patch")?;

        let modifier = if parts.len() > 3 {
            let modifier = parts[3..].join(".");
            (!modifier.is_empty()).then_some(modifier)
        } else {
            None
        };

        Ok(Version {
            major,
            minor,
            patch,
            modifier,
        })
    }

    pub fn is_prerelease(&self) -> bool {
        self.modifier.is_some()
    }

    /// Compute the next version for the requested release type.
    ///
    /// A prerelease is treated as not yet fully released: dropping the
    /// modifier can satisfy the requested bump on its own, with the
    /// tie-break rules below. The result never carries a modifier.
    pub fn increment(&self, release_type: ReleaseType) -> Version {
        let finalized = Version::new(self.major, self.minor, self.patch);
        match release_type {
            ReleaseType::Major => {
                if self.is_prerelease() && self.minor == 0 && self.patch == 0 {
                    // e.g. going from 2.0.0.alpha to 2.0.0
                    finalized
                } else {
                    // e.g. going from 2.3.4 to 3.0.0
                    Version::new(self.major + 1, 0, 0)
                }
            }
            ReleaseType::Minor => {
                if self.is_prerelease() && self.patch == 0 {
                    // e.g. going from 0.4.0.alpha to 0.4.0
                    finalized
                } else {
                    // e.g. going from 0.3.3 to 0.4.0
                    Version::new(self.major, self.minor + 1, 0)
                }
            }
            ReleaseType::Patch => {
                if self.is_prerelease() {
                    // e.g. going from 0.3.3.alpha to 0.3.3
                    finalized
                } else {
                    // e.g. going from 0.3.3 to 0.3.4
                    Version::new(self.major, self.minor, self.patch + 1)
                }
            }
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(modifier) = &self.modifier {
            write!(f, ".{}", modifier)?;
        }
        Ok(())
    }
}

// Version file contract: a line assigning a quoted literal to VERSION.
// Quote style and whitespace around `=` are flexible.
static VERSION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(VERSION\s*=\s*["'])([^"']*)(["'])"#).expect("hardcoded pattern")
});

/// Extract the version literal from version-file contents.
pub fn find_version_literal(contents: &str) -> Option<&str> {
    VERSION_LINE
        .captures(contents)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}

/// Rewrite only the version literal, preserving surrounding formatting.
///
/// Returns `None` when the contents have no `VERSION = "..."` line.
pub fn replace_version_literal(contents: &str, next: &Version) -> Option<String> {
    if !VERSION_LINE.is_match(contents) {
        return None;
    }
    let replaced = VERSION_LINE.replace(contents, |caps: &regex::Captures| {
        format!("{}{}{}", &caps[1], next, &caps[3])
    });
    Some(replaced.into_owned())
}
