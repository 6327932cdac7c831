//! Recursive walk of the dotfiles tree.
use std::path::{Path, PathBuf};

use super::action::{Action, PathPair, SkipReason, plan};
use super::classify::{Recency, TargetState, already_linked, classify, recency};
use super::executor::execute;
use super::gate::{ConfirmationGate, exists_line};
use super::mapper::PathMapper;
use super::stats::ProjectStats;
use crate::config::{ConfirmPolicy, LinkTarget, Mode, RunConfig};
use crate::error::{ConfigError, DeployError};
use crate::logging::{Log, ProjectStatus};
use crate::operations::{FileKind, FileSystemOps};
use crate::style::Line;

/// Drives mapping, classification, authorization and execution for every
/// entry under the dotfiles root.
///
/// The walk is depth-first and top-down. Unless file mode is on, a
/// directory whose target slot is empty or holds a link is handled as one
/// entry and never descended; a directory whose target is a real directory
/// is descended and resolved entry by entry.
pub struct TreeWalker<'a> {
    config: &'a RunConfig,
    mapper: PathMapper,
    fs: &'a dyn FileSystemOps,
    gate: ConfirmationGate,
    log: &'a dyn Log,
}

impl std::fmt::Debug for TreeWalker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeWalker")
            .field("config", &self.config)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

impl<'a> TreeWalker<'a> {
    /// Create a walker for `config`.
    #[must_use]
    pub fn new(
        config: &'a RunConfig,
        fs: &'a dyn FileSystemOps,
        gate: ConfirmationGate,
        log: &'a dyn Log,
    ) -> Self {
        let mapper = PathMapper::new(
            config.dotfiles_root.clone(),
            config.home.clone(),
            config.etc_target.clone(),
        );
        Self {
            config,
            mapper,
            fs,
            gate,
            log,
        }
    }

    /// Deploy every project under the dotfiles root.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::Config`] if the root is not a directory,
    /// [`DeployError::Aborted`] if the operator stops the run, and
    /// [`DeployError::Io`] or [`DeployError::Exec`] for unrecoverable
    /// filesystem failures. Permission failures are logged and counted
    /// instead.
    pub fn run(&mut self) -> Result<(), DeployError> {
        let config = self.config;
        let root = config.dotfiles_root.as_path();
        if !self.fs.is_dir(root) {
            return Err(ConfigError::NotADirectory {
                path: root.to_path_buf(),
            }
            .into());
        }

        for project in self.read_dir(root)? {
            if !self.fs.is_dir(&project) {
                continue;
            }
            let Some(name) = project.file_name() else {
                continue;
            };
            let display_name = name.to_string_lossy();

            if config.is_ignored(name) {
                self.log.debug(&format!("ignoring project {display_name}"));
                self.log
                    .record_project(&display_name, ProjectStatus::NotApplicable, None);
                continue;
            }

            self.log.stage(&display_name);
            let mut stats = ProjectStats::default();
            self.walk_children(&project, &mut stats)?;
            self.log.info(&stats.summary());
            self.log
                .record_project(&display_name, stats.status(), Some(&stats.summary()));
        }
        Ok(())
    }

    fn read_dir(&self, dir: &Path) -> Result<Vec<PathBuf>, DeployError> {
        self.fs.read_dir(dir).map_err(|source| DeployError::Io {
            path: dir.to_path_buf(),
            source,
        })
    }

    fn pair_for(&self, source: &Path) -> Option<PathPair> {
        let target = self.mapper.map(source)?;
        Some(PathPair::new(source.to_path_buf(), target))
    }

    fn walk_children(&mut self, dir: &Path, stats: &mut ProjectStats) -> Result<(), DeployError> {
        for child in self.read_dir(dir)? {
            let kind = self.fs.kind(&child).map_err(|source| DeployError::Io {
                path: child.clone(),
                source,
            })?;
            match kind {
                Some(FileKind::Directory) => {
                    if child
                        .file_name()
                        .is_some_and(|name| self.config.is_ignored(name))
                    {
                        self.log.debug(&format!("ignoring {}", child.display()));
                        continue;
                    }
                    self.visit_dir(&child, stats)?;
                }
                // A linked source directory is one entry and is never descended.
                Some(FileKind::File | FileKind::Symlink) => {
                    if let Some(pair) = self.pair_for(&child) {
                        let state = classify(self.fs, &pair.target)?;
                        self.handle(&pair, state, stats)?;
                    }
                }
                None => {}
            }
        }
        Ok(())
    }

    fn visit_dir(&mut self, dir: &Path, stats: &mut ProjectStats) -> Result<(), DeployError> {
        let Some(pair) = self.pair_for(dir) else {
            return Ok(());
        };
        let state = classify(self.fs, &pair.target)?;

        let files_only = self.config.link_target == LinkTarget::FilesOnly;
        let descend = match state {
            TargetState::Directory => true,
            TargetState::Absent => files_only,
            TargetState::ValidSymlink => files_only && self.fs.is_dir(&pair.target),
            TargetState::RegularFile | TargetState::BrokenSymlink => false,
        };

        if descend {
            self.walk_children(dir, stats)
        } else if !files_only || self.config.mode == Mode::Remove {
            self.handle(&pair, state, stats)
        } else {
            let line = Line::new()
                .quoted(pair.target.display())
                .warning(" is not a directory, cannot link files into it. Skipping...");
            self.log.warn(&line.render(self.log.color()));
            stats.skipped += 1;
            Ok(())
        }
    }

    fn handle(
        &mut self,
        pair: &PathPair,
        state: TargetState,
        stats: &mut ProjectStats,
    ) -> Result<(), DeployError> {
        let linked = matches!(
            state,
            TargetState::Directory | TargetState::RegularFile | TargetState::ValidSymlink
        ) && already_linked(self.fs, &pair.source, &pair.target);
        let age = if state == TargetState::Absent || state == TargetState::BrokenSymlink {
            Recency::Unknown
        } else {
            recency(self.fs, &pair.source, &pair.target)
        };

        let action = plan(
            self.config.mode,
            state,
            linked,
            age,
            self.config.only_newer,
        );
        if let Action::Skip(reason) = action {
            self.report_skip(reason, pair, stats);
            return Ok(());
        }

        if !self.gate.authorize(pair, action, state, age, self.log)? {
            if self.gate.policy() == ConfirmPolicy::AutoNo {
                stats.dry_run += 1;
            } else {
                stats.skipped += 1;
            }
            return Ok(());
        }

        match execute(self.fs, action, pair) {
            Ok(()) => {
                self.log.debug(&format!(
                    "{} {} -> {}",
                    action.verb().to_lowercase(),
                    pair.target.display(),
                    pair.source.display()
                ));
                stats.record(action);
                Ok(())
            }
            Err(e) if e.is_recoverable() => {
                self.log.error(&e.to_string());
                stats.failed += 1;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn report_skip(&self, reason: SkipReason, pair: &PathPair, stats: &mut ProjectStats) {
        let color = self.log.color();
        match reason {
            SkipReason::AlreadyLinked => {
                self.log
                    .debug(&format!("already linked: {}", pair.target.display()));
                stats.already_ok += 1;
            }
            SkipReason::NothingToRemove => {
                self.log
                    .debug(&format!("nothing to remove: {}", pair.target.display()));
                stats.already_ok += 1;
            }
            SkipReason::Exists => {
                self.log.info(&exists_line(&pair.target).render(color));
                stats.skipped += 1;
            }
            SkipReason::TargetNewer => {
                let line = Line::new()
                    .quoted(pair.target.display())
                    .plain(" is not older than its source. Skipping...");
                self.log.info(&line.render(color));
                stats.skipped += 1;
            }
        }
    }
}
