//! Confirmation gate: the single authorization point for every mutation.
//!
//! The gate first applies the containment [`Boundary`], then the live
//! [`ConfirmPolicy`]. The policy starts from the run configuration and is the
//! only piece of state that changes during a run: answering "Y" at a prompt
//! escalates it to [`ConfirmPolicy::AutoYes`].
use std::path::{Path, PathBuf};

use super::action::{Action, PathPair};
use super::classify::{Recency, TargetState};
use super::prompt::{Answer, Prompter};
use crate::config::ConfirmPolicy;
use crate::error::DeployError;
use crate::logging::Log;
use crate::style::Line;

const CHOICES: &str = "[y(es) / n(o); Y(ES) (to all) / N(O) (to all)]: ";

/// Where mutations are permitted.
#[derive(Debug, Clone)]
pub struct Boundary {
    home: PathBuf,
    root_aware: bool,
    elevated: bool,
}

impl Boundary {
    /// Create a boundary around `home`.
    #[must_use]
    pub const fn new(home: PathBuf, root_aware: bool, elevated: bool) -> Self {
        Self {
            home,
            root_aware,
            elevated,
        }
    }

    /// Why a mutation of `target` is refused, if it is.
    ///
    /// An elevated run without `--root` may not mutate anything. Otherwise
    /// destructive actions must stay under `home` unless `--root` is given.
    #[must_use]
    pub fn refusal(&self, target: &Path, destructive: bool) -> Option<Line> {
        if self.root_aware {
            return None;
        }
        if self.elevated {
            return Some(
                Line::new()
                    .quoted(target.display())
                    .warning(" not changed: running elevated without --root. Skipping..."),
            );
        }
        if destructive && !target.starts_with(&self.home) {
            return Some(
                Line::new()
                    .quoted(target.display())
                    .warning(" is outside of home folder. Skipping..."),
            );
        }
        None
    }

}

/// Decides whether each proposed action may run.
pub struct ConfirmationGate {
    policy: ConfirmPolicy,
    boundary: Boundary,
    prompter: Box<dyn Prompter>,
}

impl std::fmt::Debug for ConfirmationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmationGate")
            .field("policy", &self.policy)
            .field("boundary", &self.boundary)
            .finish_non_exhaustive()
    }
}

impl ConfirmationGate {
    /// Create a gate starting from `policy`.
    #[must_use]
    pub fn new(policy: ConfirmPolicy, boundary: Boundary, prompter: Box<dyn Prompter>) -> Self {
        Self {
            policy,
            boundary,
            prompter,
        }
    }

    /// The current, possibly escalated, policy.
    #[must_use]
    pub const fn policy(&self) -> ConfirmPolicy {
        self.policy
    }

    /// Decide whether `action` may be applied to `pair`.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::Aborted`] when the operator answers "N" or
    /// closes input, and [`DeployError::Io`] if the prompt cannot be shown.
    pub fn authorize(
        &mut self,
        pair: &PathPair,
        action: Action,
        state: TargetState,
        recency: Recency,
        log: &dyn Log,
    ) -> Result<bool, DeployError> {
        if matches!(action, Action::Skip(_)) {
            return Ok(false);
        }

        if let Some(reason) = self
            .boundary
            .refusal(&pair.target, action.is_destructive(state))
        {
            log.warn(&reason.render(log.color()));
            return Ok(false);
        }

        match self.policy {
            ConfirmPolicy::AutoNo => {
                for line in action.shell_equivalent(pair, state) {
                    log.dry_run(&line);
                }
                Ok(false)
            }
            ConfirmPolicy::AutoYes => {
                audit(action, pair, state, log);
                Ok(true)
            }
            ConfirmPolicy::AutoSkip => {
                if matches!(state, TargetState::Absent | TargetState::BrokenSymlink) {
                    audit(action, pair, state, log);
                    Ok(true)
                } else {
                    log.info(&exists_line(&pair.target).render(log.color()));
                    Ok(false)
                }
            }
            ConfirmPolicy::Prompt => self.ask(pair, action, state, recency, log),
        }
    }

    fn ask(
        &mut self,
        pair: &PathPair,
        action: Action,
        state: TargetState,
        recency: Recency,
        log: &dyn Log,
    ) -> Result<bool, DeployError> {
        let lines = question(pair, action, state, recency);
        loop {
            let reply = self
                .prompter
                .ask(&lines)
                .map_err(|source| DeployError::Io {
                    path: pair.target.clone(),
                    source,
                })?;
            let Some(reply) = reply else {
                return Err(DeployError::Aborted);
            };
            match Answer::parse(&reply) {
                Some(Answer::Yes) => return Ok(true),
                Some(Answer::No) => {
                    log.debug(&format!("declined: {}", pair.target.display()));
                    return Ok(false);
                }
                Some(Answer::YesToAll) => {
                    self.policy = ConfirmPolicy::AutoYes;
                    return Ok(true);
                }
                Some(Answer::NoToAll) => return Err(DeployError::Aborted),
                None => {}
            }
        }
    }
}

fn audit(action: Action, pair: &PathPair, state: TargetState, log: &dyn Log) {
    for line in action.shell_equivalent(pair, state) {
        log.info(&line);
    }
}

/// The "already exists" notice for `target`.
pub(crate) fn exists_line(target: &Path) -> Line {
    Line::new()
        .quoted(target.display())
        .plain(" already exists. Skipping...")
}

/// Build the confirmation question for one action.
pub(crate) fn question(
    pair: &PathPair,
    action: Action,
    state: TargetState,
    recency: Recency,
) -> Vec<Line> {
    let head = Line::new().bold(action.verb()).plain(" ");
    let head = match action {
        Action::RemoveTarget => head.quoted(pair.target.display()).plain("?"),
        Action::ReplaceWithLink => head
            .quoted(pair.target.display())
            .plain(" with ")
            .quoted(pair.source.display())
            .plain("?"),
        Action::CreateLink | Action::Skip(_) => head
            .quoted(pair.source.display())
            .plain(" to ")
            .quoted(pair.target.display())
            .plain("?"),
    };
    let mut lines = vec![head];

    if action == Action::ReplaceWithLink && state != TargetState::BrokenSymlink {
        match recency {
            Recency::SourceNewer => {
                lines.push(Line::new().warning("The source is newer than the target."));
            }
            Recency::TargetNewer => {
                lines.push(Line::new().warning("The target is newer than the source."));
            }
            Recency::Unknown => {}
        }
    }

    let destructive = action.is_destructive(state);
    match state {
        TargetState::Directory if destructive => lines.push(
            Line::new().error("WARNING: This will delete all contents in the directory"),
        ),
        TargetState::RegularFile if destructive => {
            lines.push(Line::new().error("WARNING: This will delete the target file"));
        }
        TargetState::BrokenSymlink if action == Action::ReplaceWithLink => lines.push(
            Line::new().error("WARNING: This symlink is broken (replace recommended)"),
        ),
        _ => {}
    }

    lines.push(Line::new().plain(CHOICES));
    lines
}
