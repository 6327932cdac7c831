//! Path pairs, actions and the planning table.
use std::path::PathBuf;

use super::classify::{Recency, TargetState};
use crate::config::Mode;

/// A source entry and the target it deploys to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPair {
    /// Entry inside the dotfiles root.
    pub source: PathBuf,
    /// Mapped location in the target tree.
    pub target: PathBuf,
}

impl PathPair {
    /// Create a new pair.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }
}

/// Why an entry needs no mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The target already resolves to the source.
    AlreadyLinked,
    /// Something occupies the target and the mode does not replace it.
    Exists,
    /// The target is not older than the source (`--newer`).
    TargetNewer,
    /// Remove mode found nothing at the target.
    NothingToRemove,
}

/// What to do with one path pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Link an empty target slot to the source.
    CreateLink,
    /// Delete whatever is at the target, then link it.
    ReplaceWithLink,
    /// Delete whatever is at the target.
    RemoveTarget,
    /// Leave the target alone.
    Skip(SkipReason),
}

impl Action {
    /// Whether executing this action deletes a real file or directory.
    #[must_use]
    pub const fn is_destructive(self, state: TargetState) -> bool {
        match self {
            Self::RemoveTarget => true,
            Self::ReplaceWithLink => state.is_real(),
            Self::CreateLink | Self::Skip(_) => false,
        }
    }

    /// Verb shown at the start of a confirmation question.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::CreateLink => "Symlink",
            Self::ReplaceWithLink => "Replace",
            Self::RemoveTarget => "Remove",
            Self::Skip(_) => "Skip",
        }
    }

    /// Shell commands equivalent to this action, for dry-run and audit output.
    #[must_use]
    pub fn shell_equivalent(self, pair: &PathPair, state: TargetState) -> Vec<String> {
        let source = pair.source.display();
        let target = pair.target.display();
        let delete = if state == TargetState::Directory {
            format!("rm -r {target}")
        } else {
            format!("unlink {target}")
        };
        match self {
            Self::CreateLink => vec![format!("ln -s {source} {target}")],
            Self::ReplaceWithLink => vec![delete, format!("ln -s {source} {target}")],
            Self::RemoveTarget => vec![delete],
            Self::Skip(_) => Vec::new(),
        }
    }
}

/// Decide the action for one entry.
///
/// A target that already resolves to the source is left alone, except
/// that remove mode still unlinks an actual symlink. Broken links are always
/// repaired outside remove mode. With `only_newer`, replace mode keeps any
/// target that is not provably older than its source.
#[must_use]
pub fn plan(
    mode: Mode,
    state: TargetState,
    already_linked: bool,
    recency: Recency,
    only_newer: bool,
) -> Action {
    if already_linked && !(mode == Mode::Remove && state == TargetState::ValidSymlink) {
        return Action::Skip(SkipReason::AlreadyLinked);
    }

    match (mode, state) {
        (Mode::Remove, TargetState::Absent) => Action::Skip(SkipReason::NothingToRemove),
        (Mode::Remove, _) => Action::RemoveTarget,
        (_, TargetState::Absent) => Action::CreateLink,
        (_, TargetState::BrokenSymlink) => Action::ReplaceWithLink,
        (Mode::Normal, _) => Action::Skip(SkipReason::Exists),
        (Mode::Replace, _) if only_newer && !recency.is_stale() => {
            Action::Skip(SkipReason::TargetNewer)
        }
        (Mode::Replace, _) => Action::ReplaceWithLink,
    }
}
