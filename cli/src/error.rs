//! Domain-specific error types for the deployment engine.
//!
//! Internal modules return typed errors (e.g., [`ConfigError`], [`ExecError`])
//! while the command handler at the CLI boundary converts them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! DeployError
//! ├── Config(ConfigError) : dotfiles root, home directory, unsupported flags
//! ├── Aborted             : operator answered "always no" or closed input
//! ├── Exec(ExecError)     : a filesystem mutation failed
//! └── Io { path, source } : reading the source or target tree failed
//! ```
//!
//! Only [`ExecError::PermissionDenied`] is recovered from: the walker logs it
//! and moves on to the next entry.  Everything else ends the run.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for a deployment run.
#[derive(Error, Debug)]
pub enum DeployError {
    /// Configuration problem detected before or during the run.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The operator chose to stop the run.
    #[error("Aborted by user")]
    Aborted,

    /// A filesystem mutation failed in a way that cannot be skipped.
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// Reading the filesystem failed while walking or classifying.
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        /// Path being inspected when the error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl DeployError {
    /// Process exit code for this error.
    ///
    /// `2` marks a deliberate operator abort, `1` everything else.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Aborted => 2,
            Self::Config(_) | Self::Exec(_) | Self::Io { .. } => 1,
        }
    }
}

/// Errors that arise while assembling the run configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The dotfiles root is missing or is not a directory.
    #[error("'{}' is not a directory", .path.display())]
    NotADirectory {
        /// The offending dotfiles root.
        path: PathBuf,
    },

    /// Neither `--home` nor the platform home variable is available.
    #[error("cannot determine home directory; set HOME or pass --home")]
    HomeNotFound,

    /// A flag is recognised but its behaviour is not provided.
    #[error("{flag} is not supported")]
    Unsupported {
        /// The flag as typed on the command line.
        flag: String,
    },

    /// An I/O error occurred while reading a config file.
    #[error("IO error reading config file {}: {source}", .path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for the expected schema.
    #[error("Invalid config in {}: {message}", .path.display())]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
}

/// Errors raised by the action executor.
#[derive(Error, Debug)]
pub enum ExecError {
    /// The OS refused access to the source or the target.
    #[error(
        "Permission denied when attempting to access '{}' and '{}'",
        .source_path.display(),
        .target.display()
    )]
    PermissionDenied {
        /// The dotfiles entry being deployed.
        source_path: PathBuf,
        /// The path in the target tree.
        target: PathBuf,
        /// Underlying I/O error.
        #[source]
        io: std::io::Error,
    },

    /// Any other I/O failure during a mutation.
    #[error("{op} failed for '{}': {io}", .path.display())]
    Io {
        /// Short name of the failed operation (e.g. `"symlink"`).
        op: &'static str,
        /// Path the operation was applied to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        io: std::io::Error,
    },
}

impl ExecError {
    /// Classify an I/O error raised while executing an action on `source` → `target`.
    #[must_use]
    pub fn from_io(
        op: &'static str,
        source_path: &std::path::Path,
        target: &std::path::Path,
        io: std::io::Error,
    ) -> Self {
        if io.kind() == std::io::ErrorKind::PermissionDenied {
            Self::PermissionDenied {
                source_path: source_path.to_path_buf(),
                target: target.to_path_buf(),
                io,
            }
        } else {
            Self::Io {
                op,
                path: target.to_path_buf(),
                io,
            }
        }
    }

    /// Whether the walker may log this error and continue.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}
