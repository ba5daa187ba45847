use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::device::discovery;
use crate::exec::Executor;
use crate::logging::Logger;

/// Run the devices command: list every device adb reports, in any state.
///
/// # Errors
///
/// Returns an error if adb is unavailable.
pub fn run(global: &GlobalOpts, executor: &dyn Executor, log: &Logger) -> Result<()> {
    log.stage("Checking adb");
    log.info(&discovery::check_adb(executor, &global.adb)?);

    log.stage("Devices");
    let devices = discovery::list_devices(executor, &global.adb)?;
    if devices.is_empty() {
        log.warn("no devices connected");
    }
    for device in &devices {
        if device.is_ready() {
            log.info(&format!("\x1b[32m✓\x1b[0m {device}"));
        } else {
            log.info(&format!("\x1b[33m○\x1b[0m {device} [{}]", device.state));
        }
    }
    Ok(())
}
