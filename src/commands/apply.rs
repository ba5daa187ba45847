use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::Result;

use super::{CommandSetup, interrupt_flag, load_permissions};
use crate::cli::GlobalOpts;
use crate::exec::Executor;
use crate::logging::Logger;
use crate::provision::{self, ProvisionSummary};

/// Run the apply command (grants only, nothing is installed).
///
/// # Errors
///
/// Returns an error if adb, the device, or the configuration is unavailable.
pub fn run(global: &GlobalOpts, executor: Arc<dyn Executor>, log: &Arc<Logger>) -> Result<()> {
    let setup = CommandSetup::init(global, executor, log)?;
    execute(global, &setup, log, interrupt_flag(log))?;
    Ok(())
}

/// Run the apply-only workflow on an already selected device and print the
/// summary.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub fn execute(
    global: &GlobalOpts,
    setup: &CommandSetup,
    log: &Arc<Logger>,
    cancelled: Arc<AtomicBool>,
) -> Result<ProvisionSummary> {
    let permissions = load_permissions(&global.config, log)?;
    log.stage("Applying permissions");
    let ctx = setup.context(log, global.dry_run, cancelled);
    let summary = provision::run_apply_only(&ctx, &permissions);
    log.print_summary();
    Ok(summary)
}
