//! Install workflow: install each artifact, then apply its matched grants.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::{Context, ItemOutcome, ProvisionSummary, SkipReason};
use crate::config::Permissions;
use crate::grants::GrantApplier;
use crate::matcher;
use crate::resources::Applicable;
use crate::resources::apk::ApkInstallResource;

/// Extension of installable artifacts (compared case-insensitively).
const APK_EXTENSION: &str = "apk";

/// List the APK files directly inside `dir`, sorted by filename.
///
/// # Errors
///
/// Returns an error if `dir` does not exist or cannot be read.
pub fn discover_artifacts(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("reading apk directory {}", dir.display()))?;
    let mut artifacts = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("reading apk directory {}", dir.display()))?
            .path();
        let is_apk = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case(APK_EXTENSION));
        if is_apk && path.is_file() {
            artifacts.push(path);
        }
    }
    artifacts.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(artifacts)
}

fn display_name(artifact: &Path) -> String {
    artifact
        .file_name()
        .map_or_else(|| artifact.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Install every artifact in order and apply the matched grant bundles.
///
/// Grants are never applied to an artifact whose install failed.
#[must_use]
pub fn run_install(
    ctx: &Context,
    artifacts: &[PathBuf],
    permissions: &Permissions,
) -> ProvisionSummary {
    let mut summary = ProvisionSummary::default();
    let total = artifacts.len();
    let applier = GrantApplier::new(ctx.shell.as_ref(), ctx.log.as_ref());

    for (index, artifact) in artifacts.iter().enumerate() {
        let name = display_name(artifact);
        if ctx.is_cancelled() {
            let remaining: Vec<String> = artifacts
                .iter()
                .skip(index)
                .map(|a| display_name(a))
                .collect();
            summary.interrupt(ctx, remaining.iter().map(String::as_str));
            break;
        }

        ctx.log
            .stage(&format!("[{} / {total}] Installing {name}", index + 1));

        let Some((logical, bundle)) = matcher::find_bundle(artifact, permissions) else {
            summary.record(ctx, &name, ItemOutcome::Skipped(SkipReason::NoConfiguration));
            continue;
        };
        ctx.log.debug(&format!("{name} matches '{logical}'"));

        let Some(package) = bundle.package_id() else {
            summary.record(ctx, &name, ItemOutcome::Skipped(SkipReason::NoPackage));
            continue;
        };

        let install = ApkInstallResource::new(artifact, &bundle.install_flags, ctx.shell.as_ref());
        if let Err(e) = install.apply() {
            ctx.log.error(&format!("{}: {e}", install.description()));
            summary.record(
                ctx,
                &name,
                ItemOutcome::Skipped(SkipReason::InstallFailed(e.to_string())),
            );
            continue;
        }

        let outcome = match applier.apply(package, bundle) {
            Ok(report) => ItemOutcome::Provisioned(report),
            Err(e) => ItemOutcome::Skipped(SkipReason::GrantsFailed(e.to_string())),
        };
        summary.record(ctx, &name, outcome);
    }

    summary
}
