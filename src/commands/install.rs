use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::Result;

use super::{CommandSetup, interrupt_flag, load_permissions};
use crate::cli::GlobalOpts;
use crate::exec::Executor;
use crate::logging::Logger;
use crate::provision::{self, ProvisionSummary};

/// Run the install command.
///
/// # Errors
///
/// Returns an error if adb, the device, the configuration, or the apk
/// directory is unavailable.  Per-artifact failures are reported in the
/// summary instead.
pub fn run(global: &GlobalOpts, executor: Arc<dyn Executor>, log: &Arc<Logger>) -> Result<()> {
    let setup = CommandSetup::init(global, executor, log)?;
    execute(global, &setup, log, interrupt_flag(log))?;
    Ok(())
}

/// Run the install workflow on an already selected device and print the
/// summary.
///
/// # Errors
///
/// Returns an error if the configuration or apk directory cannot be read.
pub fn execute(
    global: &GlobalOpts,
    setup: &CommandSetup,
    log: &Arc<Logger>,
    cancelled: Arc<AtomicBool>,
) -> Result<ProvisionSummary> {
    let permissions = load_permissions(&global.config, log)?;

    log.stage("Discovering APKs");
    let artifacts = provision::discover_artifacts(&global.apk_dir)?;
    log.info(&format!(
        "found {} APK(s) in {}",
        artifacts.len(),
        global.apk_dir.display()
    ));

    let ctx = setup.context(log, global.dry_run, cancelled);
    let summary = provision::run_install(&ctx, &artifacts, &permissions);
    log.print_summary();
    Ok(summary)
}
