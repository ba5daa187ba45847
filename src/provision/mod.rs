//! The provisioning engine: install and apply-only workflows.
//!
//! Both workflows are linear scans.  Failures local to one artifact or entry
//! are recorded and never stop the batch; only setup failures in the calling
//! command are fatal.
pub mod apply_only;
pub mod install;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::device::DeviceShell;
use crate::grants::GrantReport;
use crate::logging::{ItemStatus, Log};

pub use apply_only::run_apply_only;
pub use install::{discover_artifacts, run_install};

/// Shared context for one provisioning run.
pub struct Context {
    /// Channel to the selected device.
    pub shell: Arc<dyn DeviceShell>,
    /// Logger for output and item recording.
    pub log: Arc<dyn Log>,
    /// Whether device mutations are logged instead of run.
    pub dry_run: bool,
    /// Set by the Ctrl-C handler; checked before each item.
    pub cancelled: Arc<AtomicBool>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("shell", &"<dyn DeviceShell>")
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("cancelled", &self.cancelled)
            .finish()
    }
}

impl Context {
    /// Create a context with its own, unset cancellation flag.
    #[must_use]
    pub fn new(shell: Arc<dyn DeviceShell>, log: Arc<dyn Log>, dry_run: bool) -> Self {
        Self {
            shell,
            log,
            dry_run,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share `flag` as the cancellation flag.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = flag;
        self
    }

    /// Whether the operator asked to stop.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Why an artifact or configuration entry was not provisioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No configuration entry matched the artifact.
    NoConfiguration,
    /// The entry has no package identifier.
    NoPackage,
    /// `adb install` failed; grants were not attempted.
    InstallFailed(String),
    /// The entry asks for no grant work.
    NothingToApply,
    /// The bundle could not be applied at all.
    GrantsFailed(String),
    /// The run was interrupted before this item.
    Interrupted,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoConfiguration => f.write_str("no configuration"),
            Self::NoPackage => f.write_str("no package"),
            Self::InstallFailed(detail) => write!(f, "install failed: {detail}"),
            Self::NothingToApply => f.write_str("nothing to apply"),
            Self::GrantsFailed(detail) => write!(f, "grants not applied: {detail}"),
            Self::Interrupted => f.write_str("interrupted"),
        }
    }
}

/// What happened to one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Grants were applied (possibly with failed steps).
    Provisioned(GrantReport),
    /// Nothing was granted.
    Skipped(SkipReason),
}

/// Outcome of one artifact (install mode) or entry (apply-only mode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    /// Artifact filename or logical configuration name.
    pub name: String,
    pub outcome: ItemOutcome,
}

/// Every item processed by a run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionSummary {
    pub items: Vec<ItemReport>,
}

impl ProvisionSummary {
    /// Record an outcome here and in the logger's run summary.
    pub fn record(&mut self, ctx: &Context, name: &str, outcome: ItemOutcome) {
        match &outcome {
            ItemOutcome::Provisioned(report) if !report.is_clean() => {
                ctx.log.record_item(
                    name,
                    ItemStatus::Failed,
                    Some(&format!("failed: {}", report.failed_summary())),
                );
            }
            ItemOutcome::Provisioned(_) if ctx.dry_run => {
                ctx.log.record_item(name, ItemStatus::DryRun, None);
            }
            ItemOutcome::Provisioned(_) => {
                ctx.log.record_item(name, ItemStatus::Ok, None);
            }
            ItemOutcome::Skipped(reason) => {
                ctx.log
                    .info(&format!("\x1b[33mskipped {name}: {reason}\x1b[0m"));
                ctx.log
                    .record_item(name, ItemStatus::Skipped, Some(&reason.to_string()));
            }
        }
        self.items.push(ItemReport {
            name: name.to_string(),
            outcome,
        });
    }

    /// Items that were skipped, with their reasons.
    pub fn skipped(&self) -> impl Iterator<Item = (&str, &SkipReason)> {
        self.items.iter().filter_map(|item| match &item.outcome {
            ItemOutcome::Skipped(reason) => Some((item.name.as_str(), reason)),
            ItemOutcome::Provisioned(_) => None,
        })
    }

    /// Items whose grants ran with at least one failed step.
    pub fn with_failed_steps(&self) -> impl Iterator<Item = &ItemReport> {
        self.items.iter().filter(|item| {
            matches!(&item.outcome, ItemOutcome::Provisioned(report) if !report.is_clean())
        })
    }

    /// Record every remaining name as interrupted.
    fn interrupt<'n>(&mut self, ctx: &Context, remaining: impl IntoIterator<Item = &'n str>) {
        ctx.log.warn("interrupted; remaining items are skipped");
        for name in remaining {
            self.record(ctx, name, ItemOutcome::Skipped(SkipReason::Interrupted));
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::grants::StepOutcome;
    use crate::logging::Logger;
    use crate::resources::test_helpers::FakeShell;

    fn context(log: &Arc<Logger>, dry_run: bool) -> Context {
        Context::new(
            Arc::new(FakeShell::new()),
            Arc::clone(log) as Arc<dyn Log>,
            dry_run,
        )
    }

    fn report(failure: Option<&str>) -> GrantReport {
        GrantReport {
            package: "com.example.app".to_string(),
            steps: vec![StepOutcome {
                step: "pm grant android.permission.CAMERA".to_string(),
                failure: failure.map(String::from),
            }],
        }
    }

    #[test]
    fn skip_reason_display() {
        assert_eq!(SkipReason::NoConfiguration.to_string(), "no configuration");
        assert_eq!(
            SkipReason::InstallFailed("exit 1".to_string()).to_string(),
            "install failed: exit 1"
        );
        assert_eq!(SkipReason::Interrupted.to_string(), "interrupted");
    }

    #[test]
    fn record_maps_outcomes_to_log_status() {
        let log = Arc::new(Logger::new("test"));
        let ctx = context(&log, false);
        let mut summary = ProvisionSummary::default();
        summary.record(&ctx, "a.apk", ItemOutcome::Provisioned(report(None)));
        summary.record(&ctx, "b.apk", ItemOutcome::Provisioned(report(Some("exit 1"))));
        summary.record(&ctx, "c.apk", ItemOutcome::Skipped(SkipReason::NoConfiguration));

        let entries = log.item_entries();
        assert_eq!(entries[0].status, ItemStatus::Ok);
        assert_eq!(entries[1].status, ItemStatus::Failed);
        assert_eq!(
            entries[1].message.as_deref(),
            Some("failed: pm grant android.permission.CAMERA")
        );
        assert_eq!(entries[2].status, ItemStatus::Skipped);
        assert_eq!(summary.skipped().count(), 1);
        assert_eq!(summary.with_failed_steps().count(), 1);
    }

    #[test]
    fn dry_run_items_are_marked() {
        let log = Arc::new(Logger::new("test"));
        let ctx = context(&log, true);
        let mut summary = ProvisionSummary::default();
        summary.record(&ctx, "a.apk", ItemOutcome::Provisioned(report(None)));
        assert_eq!(log.item_entries()[0].status, ItemStatus::DryRun);
    }

    #[test]
    fn cancel_flag_is_shared() {
        let log = Arc::new(Logger::new("test"));
        let flag = Arc::new(AtomicBool::new(false));
        let ctx = context(&log, false).with_cancel_flag(Arc::clone(&flag));
        assert!(!ctx.is_cancelled());
        flag.store(true, Ordering::SeqCst);
        assert!(ctx.is_cancelled());
    }
}
