//! Run configuration assembled from the command line and `dotstow.toml`.
pub mod file;

use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::cli::{Cli, ConfirmArgs, ModeArgs};
use crate::error::ConfigError;

pub use file::FileConfig;

/// Directory names pruned from every walk.
pub const DEFAULT_IGNORE: &[&str] = &[".git"];

/// Default deployment root for the `etc` project.
pub const DEFAULT_ETC_TARGET: &str = "/etc";

/// What the run does with existing targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Create links where nothing exists; leave everything else alone.
    #[default]
    Normal,
    /// Delete targets.
    Remove,
    /// Delete existing targets and link in their place.
    Replace,
}

impl From<ModeArgs> for Mode {
    fn from(args: ModeArgs) -> Self {
        if args.remove {
            Self::Remove
        } else if args.replace {
            Self::Replace
        } else {
            Self::Normal
        }
    }
}

/// How confirmations are answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmPolicy {
    /// Ask the operator for each action.
    #[default]
    Prompt,
    /// Approve everything.
    AutoYes,
    /// Approve nothing; report what would happen.
    AutoNo,
    /// Approve only when nothing would be overwritten.
    AutoSkip,
}

impl From<ConfirmArgs> for ConfirmPolicy {
    fn from(args: ConfirmArgs) -> Self {
        if args.skip {
            Self::AutoSkip
        } else if args.yes {
            Self::AutoYes
        } else if args.no {
            Self::AutoNo
        } else {
            Self::Prompt
        }
    }
}

/// Granularity of created links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkTarget {
    /// Link whole directories when their target slot is free.
    #[default]
    LinksAndFolders,
    /// Only ever link individual files.
    FilesOnly,
}

/// Immutable settings for one invocation.
///
/// The confirmation policy recorded here is only the starting value; the
/// gate owns the live copy, which may escalate during the run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Source tree; its first-level directories are projects.
    pub dotfiles_root: PathBuf,
    /// Target tree and containment boundary.
    pub home: PathBuf,
    /// Where the `etc` project is mirrored.
    pub etc_target: PathBuf,
    /// What to do with existing targets.
    pub mode: Mode,
    /// Initial confirmation policy.
    pub confirm: ConfirmPolicy,
    /// Folder or file linking.
    pub link_target: LinkTarget,
    /// Whether destructive actions outside `home` are allowed.
    pub root_aware: bool,
    /// In replace mode, only replace targets older than their source.
    pub only_newer: bool,
    /// Directory names that are never visited.
    pub ignore: BTreeSet<String>,
}

impl RunConfig {
    /// Combine command-line flags with repository settings.
    ///
    /// Flags win over the file; `--files` can only turn file mode on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Unsupported`] when `--copy` is given.
    pub fn build(
        cli: &Cli,
        dotfiles_root: PathBuf,
        home: PathBuf,
        file: FileConfig,
    ) -> Result<Self, ConfigError> {
        if cli.copy {
            return Err(ConfigError::Unsupported {
                flag: "--copy".to_string(),
            });
        }

        let mut ignore: BTreeSet<String> =
            DEFAULT_IGNORE.iter().map(ToString::to_string).collect();
        ignore.extend(file.ignore);

        let link_target = if cli.files || file.files {
            LinkTarget::FilesOnly
        } else {
            LinkTarget::LinksAndFolders
        };

        Ok(Self {
            dotfiles_root,
            home,
            etc_target: file
                .etc_target
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ETC_TARGET)),
            mode: cli.mode.into(),
            confirm: cli.confirm.into(),
            link_target,
            root_aware: cli.root,
            only_newer: cli.newer,
            ignore,
        })
    }

    /// Whether a directory with this name is pruned.
    #[must_use]
    pub fn is_ignored(&self, name: &OsStr) -> bool {
        name.to_str().is_some_and(|n| self.ignore.contains(n))
    }
}

/// Pick the home directory: `--home`, else the platform variable.
///
/// # Errors
///
/// Returns [`ConfigError::HomeNotFound`] if neither is set.
pub fn resolve_home(flag: Option<&Path>, env: Option<OsString>) -> Result<PathBuf, ConfigError> {
    flag.map(Path::to_path_buf)
        .or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
        .ok_or(ConfigError::HomeNotFound)
}

/// Pick the dotfiles root: `--dotfiles`, else `DOTFILES_ROOT`, else `<home>/dotfiles`.
#[must_use]
pub fn resolve_dotfiles_root(flag: Option<&Path>, env: Option<OsString>, home: &Path) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| home.join("dotfiles"))
}

/// Resolve `path` to an absolute directory path.
///
/// # Errors
///
/// Returns [`ConfigError::NotADirectory`] if `path` is missing or is not a
/// directory.
pub fn require_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let not_a_dir = || ConfigError::NotADirectory {
        path: path.to_path_buf(),
    };
    if !path.is_dir() {
        return Err(not_a_dir());
    }
    dunce::canonicalize(path).map_err(|_| not_a_dir())
}
