//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::types::{Log, ProjectEntry, ProjectStatus};
use super::utils::log_file_path;
use crate::style::{Line, Style};

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with dry-run awareness and summary collection.
///
/// All messages are also written to a persistent log file at
/// `$XDG_CACHE_HOME/dotstow/<command>.log` by the subscriber's file layer,
/// with timestamps and ANSI codes stripped, regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    projects: Mutex<Vec<ProjectEntry>>,
    log_file: Option<PathBuf>,
    color: bool,
}

impl Logger {
    /// Create a new logger.
    ///
    /// Stores the log file path for display in the run summary.  The file
    /// itself is created by [`init_subscriber`](super::subscriber::init_subscriber).
    #[must_use]
    pub fn new(command: &str, color: bool) -> Self {
        Self {
            projects: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
            color,
        }
    }

    /// Create a logger that reports `path` as its log file.
    #[cfg(test)]
    pub(crate) fn at(path: PathBuf) -> Self {
        Self {
            projects: Mutex::new(Vec::new()),
            log_file: Some(path),
            color: false,
        }
    }

    /// Return the log file path, if available.
    #[cfg(test)]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded project entries (test-only).
    #[cfg(test)]
    pub(crate) fn project_entries(&self) -> Vec<ProjectEntry> {
        self.projects.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: "dotstow::stage", "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: "dotstow::dry_run", "{msg}");
    }

    /// Record a project result for the summary.
    pub fn record_project(&self, name: &str, status: ProjectStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.projects.lock() {
            guard.push(ProjectEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the projects in which at least one entry failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.projects.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|p| p.status == ProjectStatus::Failed)
                .count()
        })
    }

    /// Print the summary of all recorded projects.
    pub fn print_summary(&self) {
        let projects = match self.projects.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => return,
        };
        if projects.is_empty() {
            return;
        }

        self.stage("Summary");

        let mut ok = 0u32;
        let mut not_applicable = 0u32;
        let mut skipped = 0u32;
        let mut dry_run = 0u32;
        let mut failed = 0u32;

        for project in &projects {
            let (icon, style) = match project.status {
                ProjectStatus::Ok => {
                    ok += 1;
                    ("✓", Style::Success)
                }
                ProjectStatus::NotApplicable => {
                    not_applicable += 1;
                    ("·", Style::Muted)
                }
                ProjectStatus::Skipped => {
                    skipped += 1;
                    ("○", Style::Warning)
                }
                ProjectStatus::DryRun => {
                    dry_run += 1;
                    ("~", Style::Notice)
                }
                ProjectStatus::Failed => {
                    failed += 1;
                    ("✗", Style::Error)
                }
            };

            let suffix = project
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            let line = Line::new().push(format!("{icon} {}{suffix}", project.name), style);
            self.info(&line.render(self.color));
        }

        let total = ok + not_applicable + skipped + dry_run + failed;
        let totals = Line::new()
            .plain(format!("{total} projects: "))
            .push(format!("{ok} ok"), Style::Success)
            .plain(", ")
            .muted(format!("{not_applicable} ignored"))
            .plain(", ")
            .warning(format!("{skipped} with skips"))
            .plain(", ")
            .push(format!("{dry_run} dry-run"), Style::Notice)
            .plain(", ")
            .error(format!("{failed} failed"));
        self.info(&totals.render(self.color));

        if let Some(path) = &self.log_file {
            let line = Line::new().muted(format!("log: {}", path.display()));
            self.info(&line.render(self.color));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_project(&self, name: &str, status: ProjectStatus, message: Option<&str>) {
        self.record_project(name, status, message);
    }

    fn color(&self) -> bool {
        self.color
    }
}
