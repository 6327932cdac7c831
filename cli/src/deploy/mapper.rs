//! Source-to-target path mapping.
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Name of the project deployed under the `etc` target instead of home.
pub const ETC_PROJECT: &str = "etc";

/// Maps paths under the dotfiles root to their deployment location.
///
/// The first path segment under the root names the project and is not
/// reproduced in the target. Everything in the `etc` project lands under
/// `etc_target`; every other project lands under `home`.
#[derive(Debug, Clone)]
pub struct PathMapper {
    dotfiles_root: PathBuf,
    home: PathBuf,
    etc_target: PathBuf,
}

impl PathMapper {
    /// Create a mapper for the given roots.
    #[must_use]
    pub const fn new(dotfiles_root: PathBuf, home: PathBuf, etc_target: PathBuf) -> Self {
        Self {
            dotfiles_root,
            home,
            etc_target,
        }
    }

    /// The target for `source`, or `None` if `source` is not strictly
    /// inside the dotfiles root.
    #[must_use]
    pub fn map(&self, source: &Path) -> Option<PathBuf> {
        let relative = source.strip_prefix(&self.dotfiles_root).ok()?;
        let mut components = relative.components();
        let project = match components.next()? {
            Component::Normal(name) => name,
            _ => return None,
        };
        let rest = components.as_path();

        let base = if project == OsStr::new(ETC_PROJECT) {
            &self.etc_target
        } else {
            &self.home
        };
        if rest.as_os_str().is_empty() {
            Some(base.clone())
        } else {
            Some(base.join(rest))
        }
    }
}
