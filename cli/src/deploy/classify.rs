//! Target-state classification.
use std::path::Path;

use crate::error::DeployError;
use crate::operations::{FileKind, FileSystemOps};

/// What currently occupies a target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    /// Nothing at all, not even a dangling link.
    Absent,
    /// A real directory.
    Directory,
    /// A real file.
    RegularFile,
    /// A symlink whose referent exists.
    ValidSymlink,
    /// A symlink whose referent does not exist.
    BrokenSymlink,
}

impl TargetState {
    /// Whether this state is a real file or directory (not a link).
    #[must_use]
    pub const fn is_real(self) -> bool {
        matches!(self, Self::Directory | Self::RegularFile)
    }
}

/// Relative age of a source and its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recency {
    /// The source was modified after the target.
    SourceNewer,
    /// The target was modified after the source.
    TargetNewer,
    /// Same mtime, or one side could not be stat'ed.
    Unknown,
}

impl Recency {
    /// Whether the target is strictly older than its source.
    #[must_use]
    pub const fn is_stale(self) -> bool {
        matches!(self, Self::SourceNewer)
    }
}

/// Classify `target` without following a final symlink, except to check
/// whether its referent exists.
///
/// # Errors
///
/// Returns [`DeployError::Io`] if `target` cannot be inspected.
pub fn classify(fs: &dyn FileSystemOps, target: &Path) -> Result<TargetState, DeployError> {
    let kind = fs.kind(target).map_err(|source| DeployError::Io {
        path: target.to_path_buf(),
        source,
    })?;
    Ok(match kind {
        None => TargetState::Absent,
        Some(FileKind::Symlink) if fs.exists(target) => TargetState::ValidSymlink,
        Some(FileKind::Symlink) => TargetState::BrokenSymlink,
        Some(FileKind::Directory) => TargetState::Directory,
        Some(FileKind::File) => TargetState::RegularFile,
    })
}

/// Compare modification times of `source` and `target` (following links).
#[must_use]
pub fn recency(fs: &dyn FileSystemOps, source: &Path, target: &Path) -> Recency {
    match (fs.modified(source), fs.modified(target)) {
        (Ok(s), Ok(t)) if s > t => Recency::SourceNewer,
        (Ok(s), Ok(t)) if t > s => Recency::TargetNewer,
        _ => Recency::Unknown,
    }
}

/// Whether `target` already resolves to `source`, either as a direct link
/// or through a linked parent directory.
#[must_use]
pub fn already_linked(fs: &dyn FileSystemOps, source: &Path, target: &Path) -> bool {
    match (fs.canonicalize(source), fs.canonicalize(target)) {
        (Ok(s), Ok(t)) => s == t,
        _ => false,
    }
}
