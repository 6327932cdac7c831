//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that the deployment engine can be
//! unit-tested without touching the real filesystem.  Production code uses
//! [`SystemFileSystemOps`]; tests use `MockFileSystemOps`.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// What sits at a path, without following a final symlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A symbolic link (valid or broken).
    Symlink,
    /// A real directory.
    Directory,
    /// A regular file or any other non-directory entry.
    File,
}

/// Abstraction over the filesystem primitives the engine needs.
///
/// Implement this trait to swap in a mock during unit tests, keeping the
/// decision logic independent of real I/O.  The production implementation is
/// [`SystemFileSystemOps`].
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Kind of the entry at `path` without following symlinks, or `None` if
    /// nothing (not even a broken link) is there.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than "not found".
    fn kind(&self, path: &Path) -> io::Result<Option<FileKind>>;

    /// Returns `true` if `path` exists after following symlinks.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is a directory after following symlinks.
    fn is_dir(&self, path: &Path) -> bool;

    /// Modification time of `path`, following symlinks.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be stat'ed.
    fn modified(&self, path: &Path) -> io::Result<SystemTime>;

    /// Fully resolved form of `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if any component does not exist.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// The immediate children of the directory `path`, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be opened or read as a directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Create a symbolic link at `link` pointing to `source`.
    ///
    /// `is_dir` tells platforms that distinguish file and directory links
    /// which one to create.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be created.
    fn symlink(&self, source: &Path, link: &Path, is_dir: bool) -> io::Result<()>;

    /// Create `path` and all missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Unlink a file or a symlink (including directory symlinks).
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove_link_or_file(&self, path: &Path) -> io::Result<()>;

    /// Recursively delete the real directory at `path` and everything in it.
    ///
    /// # Errors
    ///
    /// Returns an error if any part of the tree cannot be removed.
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn kind(&self, path: &Path) -> io::Result<Option<FileKind>> {
        match std::fs::symlink_metadata(path) {
            Ok(meta) if meta.is_symlink() => Ok(Some(FileKind::Symlink)),
            Ok(meta) if meta.is_dir() => Ok(Some(FileKind::Directory)),
            Ok(_) => Ok(Some(FileKind::File)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        std::fs::metadata(path)?.modified()
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        dunce::canonicalize(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = std::fs::read_dir(path)?
            .map(|e| e.map(|entry| entry.path()))
            .collect::<io::Result<Vec<_>>>()?;
        entries.sort();
        Ok(entries)
    }

    fn symlink(&self, source: &Path, link: &Path, is_dir: bool) -> io::Result<()> {
        #[cfg(unix)]
        {
            let _ = is_dir;
            std::os::unix::fs::symlink(source, link)
        }

        #[cfg(windows)]
        {
            if is_dir {
                std::os::windows::fs::symlink_dir(source, link)
            } else {
                std::os::windows::fs::symlink_file(source, link)
            }
        }
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    /// On Windows, directory symlinks must be removed with `remove_dir` (not
    /// `remove_file`), and `symlink_metadata().is_dir()` is `false` for them,
    /// so the raw `FILE_ATTRIBUTE_DIRECTORY` bit decides.
    fn remove_link_or_file(&self, path: &Path) -> io::Result<()> {
        let meta = std::fs::symlink_metadata(path)?;
        if is_dir_like(&meta) {
            std::fs::remove_dir(path)
        } else {
            std::fs::remove_file(path)
        }
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir_all(path)
    }
}

/// Check if metadata represents a directory-like entry.
fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir() && !meta.is_symlink()
    }
}

/// Mock [`FileSystemOps`] for unit tests.
///
/// Delegates every query and mutation to a real directory (normally a
/// `tempfile::TempDir`) but can be told to fail mutations under chosen
/// prefixes with a given [`io::ErrorKind`].  Running the suite as root makes
/// real permission bits useless, so injected failures are the only reliable
/// way to exercise the permission-denied path.
///
/// # Example
///
/// ```ignore
/// let fs = MockFileSystemOps::new()
///     .fail_under("/tmp/x/home/.config", io::ErrorKind::PermissionDenied);
/// ```
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    failures: Vec<(PathBuf, io::ErrorKind)>,
    mutations: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockFileSystemOps {
    /// Create a mock that behaves exactly like the real filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every mutation of a path under `prefix` fail with `kind`.
    #[must_use]
    pub fn fail_under(mut self, prefix: impl Into<PathBuf>, kind: io::ErrorKind) -> Self {
        self.failures.push((prefix.into(), kind));
        self
    }

    /// Mutations attempted so far, formatted as `op path`.
    #[must_use]
    pub fn mutations(&self) -> Vec<String> {
        self.mutations
            .lock()
            .map_or_else(|_| Vec::new(), |g| g.clone())
    }

    fn check(&self, op: &str, path: &Path) -> io::Result<()> {
        if let Ok(mut guard) = self.mutations.lock() {
            guard.push(format!("{op} {}", path.display()));
        }
        match self.failures.iter().find(|(p, _)| path.starts_with(p)) {
            Some((_, kind)) => Err(io::Error::from(*kind)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
impl FileSystemOps for MockFileSystemOps {
    fn kind(&self, path: &Path) -> io::Result<Option<FileKind>> {
        SystemFileSystemOps.kind(path)
    }

    fn exists(&self, path: &Path) -> bool {
        SystemFileSystemOps.exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        SystemFileSystemOps.is_dir(path)
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        SystemFileSystemOps.modified(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        SystemFileSystemOps.canonicalize(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        SystemFileSystemOps.read_dir(path)
    }

    fn symlink(&self, source: &Path, link: &Path, is_dir: bool) -> io::Result<()> {
        self.check("symlink", link)?;
        SystemFileSystemOps.symlink(source, link, is_dir)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.check("mkdir", path)?;
        SystemFileSystemOps.create_dir_all(path)
    }

    fn remove_link_or_file(&self, path: &Path) -> io::Result<()> {
        self.check("unlink", path)?;
        SystemFileSystemOps.remove_link_or_file(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        self.check("rmtree", path)?;
        SystemFileSystemOps.remove_dir_all(path)
    }
}
