//! Core logging types: item entries, status, and the [`Log`] trait.

/// Outcome of one artifact or configuration entry, for summary reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemEntry {
    /// Artifact filename or logical configuration name.
    pub name: String,
    /// Final status of the item.
    pub status: ItemStatus,
    /// Optional detail message (e.g., skip reason or failed steps).
    pub message: Option<String>,
}

/// Status of a processed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    /// Installed and/or granted without any failed step.
    Ok,
    /// Not provisioned; the message carries the reason.
    Skipped,
    /// Dry run; no device state was changed.
    DryRun,
    /// Provisioned, but one or more grant steps failed.
    Failed,
}

impl ItemStatus {
    /// Lower-case label used in the run log.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Skipped => "skipped",
            Self::DryRun => "dry-run",
            Self::Failed => "failed",
        }
    }
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) is the production implementation;
/// engine and device code only see this trait.
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
    /// Record an item result for the summary.
    fn record_item(&self, name: &str, status: ItemStatus, message: Option<&str>);
}

impl std::fmt::Debug for dyn Log + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<dyn Log>")
    }
}
