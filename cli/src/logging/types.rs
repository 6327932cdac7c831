//! Core logging types: project entries, status, and the [`Log`] trait.

/// Per-project result for summary reporting.
#[derive(Debug, Clone)]
pub struct ProjectEntry {
    /// Project directory name (first level under the dotfiles root).
    pub name: String,
    /// Final status of the project.
    pub status: ProjectStatus,
    /// Optional detail message (counters or skip reason).
    pub message: Option<String>,
}

/// Status of a processed project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectStatus {
    /// Every entry was handled (linked, removed, or already correct).
    Ok,
    /// Project was excluded by the ignore list.
    NotApplicable,
    /// At least one entry was left alone because of a conflict or a "no".
    Skipped,
    /// Run in dry-run mode; nothing was changed.
    DryRun,
    /// At least one entry could not be changed because access was denied.
    Failed,
}

/// Abstraction over logging backends.
///
/// The deployment engine only ever talks to `&dyn Log`, so tests can capture
/// output without installing a global subscriber.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a project result for the summary.
    fn record_project(&self, name: &str, status: ProjectStatus, message: Option<&str>);
    /// Whether messages may carry ANSI colour codes.
    fn color(&self) -> bool {
        false
    }
}
