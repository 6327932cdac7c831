//! Optional per-repository settings read from `dotstow.toml`.
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Name of the settings file looked up at the top of the dotfiles root.
pub const FILE_NAME: &str = "dotstow.toml";

/// Settings a dotfiles repository can carry alongside its projects.
///
/// ```toml
/// ignore = ["scripts", "node_modules"]
/// files = false
/// etc_target = "/etc"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Extra directory names to prune, on top of `.git`.
    pub ignore: Vec<String>,
    /// Link files only, never whole directories.
    pub files: bool,
    /// Where the `etc` project is deployed.
    pub etc_target: Option<PathBuf>,
}

/// Load `path`, returning defaults when it does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file exists but cannot be read, or
/// [`ConfigError::Parse`] if it is not valid TOML for [`FileConfig`].
pub fn load(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(FileConfig::default()),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })
}
