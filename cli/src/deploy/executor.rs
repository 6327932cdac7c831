//! Filesystem mutations for authorized actions.
use super::action::{Action, PathPair};
use crate::error::ExecError;
use crate::operations::{FileKind, FileSystemOps};

/// Apply `action` to `pair`.
///
/// Permission failures come back as [`ExecError::PermissionDenied`] so the
/// caller can report them and continue.
///
/// # Errors
///
/// Returns an [`ExecError`] if any filesystem call fails.
pub fn execute(fs: &dyn FileSystemOps, action: Action, pair: &PathPair) -> Result<(), ExecError> {
    match action {
        Action::CreateLink => create_link(fs, pair),
        Action::RemoveTarget => remove_target(fs, pair),
        Action::ReplaceWithLink => {
            remove_target(fs, pair)?;
            create_link(fs, pair)
        }
        Action::Skip(_) => Ok(()),
    }
}

fn create_link(fs: &dyn FileSystemOps, pair: &PathPair) -> Result<(), ExecError> {
    if let Some(parent) = pair.target.parent()
        && !fs.is_dir(parent)
    {
        fs.create_dir_all(parent)
            .map_err(|e| ExecError::from_io("mkdir", &pair.source, parent, e))?;
    }
    fs.symlink(&pair.source, &pair.target, fs.is_dir(&pair.source))
        .map_err(|e| ExecError::from_io("symlink", &pair.source, &pair.target, e))
}

/// Unlink files and links; delete real directories recursively.
fn remove_target(fs: &dyn FileSystemOps, pair: &PathPair) -> Result<(), ExecError> {
    let kind = fs
        .kind(&pair.target)
        .map_err(|e| ExecError::from_io("stat", &pair.source, &pair.target, e))?;
    let result = match kind {
        None => return Ok(()),
        Some(FileKind::Directory) => fs.remove_dir_all(&pair.target),
        Some(FileKind::Symlink | FileKind::File) => fs.remove_link_or_file(&pair.target),
    };
    result.map_err(|e| ExecError::from_io("remove", &pair.source, &pair.target, e))
}
