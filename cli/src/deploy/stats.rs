//! Per-project counters for the run summary.
use super::action::Action;
use crate::logging::ProjectStatus;

/// Outcome counts for one project.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProjectStats {
    /// Links created where nothing was.
    pub linked: u32,
    /// Targets deleted and replaced by a link.
    pub replaced: u32,
    /// Targets deleted.
    pub removed: u32,
    /// Targets already in the wanted state.
    pub already_ok: u32,
    /// Entries left alone because of a conflict or a declined prompt.
    pub skipped: u32,
    /// Entries reported but not applied because of `--NO`.
    pub dry_run: u32,
    /// Entries that failed with a permission error.
    pub failed: u32,
}

impl ProjectStats {
    /// Count a successfully executed action.
    pub const fn record(&mut self, action: Action) {
        match action {
            Action::CreateLink => self.linked += 1,
            Action::ReplaceWithLink => self.replaced += 1,
            Action::RemoveTarget => self.removed += 1,
            Action::Skip(_) => self.skipped += 1,
        }
    }

    /// Overall status for the summary; the worst outcome wins.
    #[must_use]
    pub const fn status(&self) -> ProjectStatus {
        if self.failed > 0 {
            ProjectStatus::Failed
        } else if self.skipped > 0 {
            ProjectStatus::Skipped
        } else if self.dry_run > 0 {
            ProjectStatus::DryRun
        } else {
            ProjectStatus::Ok
        }
    }

    /// Summary text such as `"2 linked, 1 replaced, 4 already ok"`.
    ///
    /// Zero counts are omitted, except that an empty project reports
    /// `"nothing to do"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dotstow_cli::deploy::ProjectStats;
    ///
    /// let stats = ProjectStats { linked: 2, already_ok: 4, ..Default::default() };
    /// assert_eq!(stats.summary(), "2 linked, 4 already ok");
    /// assert_eq!(ProjectStats::default().summary(), "nothing to do");
    /// ```
    #[must_use]
    pub fn summary(&self) -> String {
        let parts: Vec<String> = [
            (self.linked, "linked"),
            (self.replaced, "replaced"),
            (self.removed, "removed"),
            (self.already_ok, "already ok"),
            (self.dry_run, "would change"),
            (self.skipped, "skipped"),
            (self.failed, "failed"),
        ]
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, label)| format!("{n} {label}"))
        .collect();

        if parts.is_empty() {
            "nothing to do".to_string()
        } else {
            parts.join(", ")
        }
    }
}
