//! Apply-only workflow: grant every configured package already on the device.
use super::{Context, ItemOutcome, ProvisionSummary, SkipReason};
use crate::config::Permissions;
use crate::grants::GrantApplier;

/// Apply every configuration entry in document order.
///
/// Entries without a package or without any grant work are skipped; an entry
/// whose bundle cannot be applied is recorded and the batch continues.
#[must_use]
pub fn run_apply_only(ctx: &Context, permissions: &Permissions) -> ProvisionSummary {
    let mut summary = ProvisionSummary::default();
    let total = permissions.len();
    let applier = GrantApplier::new(ctx.shell.as_ref(), ctx.log.as_ref());

    for (index, (name, bundle)) in permissions.iter().enumerate() {
        if ctx.is_cancelled() {
            summary.interrupt(ctx, permissions.iter().skip(index).map(|(n, _)| n));
            break;
        }

        ctx.log
            .stage(&format!("[{} / {total}] Applying {name}", index + 1));

        let Some(package) = bundle.package_id() else {
            summary.record(ctx, name, ItemOutcome::Skipped(SkipReason::NoPackage));
            continue;
        };
        if !bundle.has_grant_work() {
            summary.record(ctx, name, ItemOutcome::Skipped(SkipReason::NothingToApply));
            continue;
        }

        let outcome = match applier.apply(package, bundle) {
            Ok(report) => ItemOutcome::Provisioned(report),
            Err(e) => {
                ctx.log.error(&format!("{name}: {e}"));
                ItemOutcome::Skipped(SkipReason::GrantsFailed(e.to_string()))
            }
        };
        summary.record(ctx, name, outcome);
    }

    summary
}
