use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ReleaseError, Result};
use crate::version::ReleaseType;

/// Project-local config file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = ".release-assistant.toml";

/// File name under the user config directory (fallback location)
const USER_CONFIG_FILE_NAME: &str = "release-assistant.toml";

/// Resolved release options, immutable once constructed.
///
/// Built by merging defaults, then the config file, then explicit CLI
/// flags, key by key.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOptions {
    pub release_type: ReleaseType,
    pub primary_branch: Option<String>,
    pub push_to_registry: bool,
    pub tag_prefix: String,
    pub show_command_output: bool,
    pub debug: bool,
    pub post_release_query: Option<String>,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        ReleaseOptions {
            release_type: ReleaseType::Patch,
            primary_branch: None,
            push_to_registry: false,
            tag_prefix: String::new(),
            show_command_output: false,
            debug: false,
            post_release_query: None,
        }
    }
}

/// Raw contents of the config file; every key optional.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(rename = "type")]
    pub release_type: Option<ReleaseType>,

    pub primary_branch: Option<String>,

    #[serde(alias = "rubygems")]
    pub push_to_registry: Option<bool>,

    pub tag_prefix: Option<String>,

    #[serde(alias = "show_system_output")]
    pub show_command_output: Option<bool>,

    pub debug: Option<bool>,

    pub post_release_query: Option<String>,
}

impl ConfigFile {
    /// Load the config file.
    ///
    /// Lookup order:
    /// 1. Explicit path (missing file is an error)
    /// 2. `.release-assistant.toml` in the working directory
    /// 3. `release-assistant.toml` in the user config directory
    /// 4. Empty config (absence of a discovered file is not an error)
    pub fn load(path: Option<&Path>) -> Result<ConfigFile> {
        let contents = if let Some(path) = path {
            fs::read_to_string(path)?
        } else if Path::new(CONFIG_FILE_NAME).exists() {
            fs::read_to_string(CONFIG_FILE_NAME)?
        } else if let Some(config_dir) = dirs::config_dir() {
            let fallback = config_dir.join(USER_CONFIG_FILE_NAME);
            if fallback.exists() {
                fs::read_to_string(fallback)?
            } else {
                return Ok(ConfigFile::default());
            }
        } else {
            return Ok(ConfigFile::default());
        };

        toml::from_str(&contents).map_err(|e| ReleaseError::config(e.to_string()))
    }
}

/// Options the user passed explicitly on the command line.
///
/// Bools are only overriding when set; an omitted flag leaves the config
/// file's value in place.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub release_type: Option<ReleaseType>,
    pub debug: bool,
    pub show_command_output: bool,
}

impl ReleaseOptions {
    pub fn resolve(file: ConfigFile, cli: CliOverrides) -> ReleaseOptions {
        let mut options = ReleaseOptions::default();

        if let Some(release_type) = file.release_type {
            options.release_type = release_type;
        }
        options.primary_branch = file.primary_branch;
        if let Some(push_to_registry) = file.push_to_registry {
            options.push_to_registry = push_to_registry;
        }
        if let Some(tag_prefix) = file.tag_prefix {
            options.tag_prefix = tag_prefix;
        }
        if let Some(show_command_output) = file.show_command_output {
            options.show_command_output = show_command_output;
        }
        if let Some(debug) = file.debug {
            options.debug = debug;
        }
        options.post_release_query = file.post_release_query;

        if let Some(release_type) = cli.release_type {
            options.release_type = release_type;
        }
        options.debug |= cli.debug;
        options.show_command_output |= cli.show_command_output;

        options
    }
}
