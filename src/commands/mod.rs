//! Command orchestration: setup shared by every workflow, then dispatch.
pub mod apply;
pub mod devices;
pub mod install;
pub mod interactive;
pub mod prompt;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::{self, Permissions};
use crate::device::discovery::{self, DeviceSummary};
use crate::device::{AdbShell, DeviceShell};
use crate::error::DeviceError;
use crate::exec::Executor;
use crate::logging::{Log, Logger};
use crate::provision::Context;

/// The selected device and the shell bound to it.
///
/// Produced once per run before any workflow starts; every failure here is
/// fatal.
#[derive(Debug)]
pub struct CommandSetup {
    pub device: DeviceSummary,
    pub shell: Arc<AdbShell>,
}

impl CommandSetup {
    /// Check adb, enumerate devices, and select one.
    ///
    /// With several ready devices and no `--serial`, the operator is asked
    /// on the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if adb is unavailable, no device is ready, or the
    /// selection is invalid.
    pub fn init(
        global: &GlobalOpts,
        executor: Arc<dyn Executor>,
        log: &Arc<Logger>,
    ) -> Result<Self> {
        Self::init_with(global, executor, log, |ready| {
            let options: Vec<String> = ready.iter().map(ToString::to_string).collect();
            prompt::prompt_select("Multiple devices detected:", &options)
                .map_err(|e| DeviceError::InvalidSelection(e.to_string()))
        })
    }

    /// [`init`](Self::init) with an injectable device prompt.
    ///
    /// # Errors
    ///
    /// See [`init`](Self::init).
    pub fn init_with(
        global: &GlobalOpts,
        executor: Arc<dyn Executor>,
        log: &Arc<Logger>,
        ask: impl FnOnce(&[DeviceSummary]) -> Result<usize, DeviceError>,
    ) -> Result<Self> {
        log.stage("Checking adb");
        let version = discovery::check_adb(executor.as_ref(), &global.adb)?;
        log.info(&version);

        log.stage("Selecting device");
        let devices = discovery::list_devices(executor.as_ref(), &global.adb)?;
        for device in devices.iter().filter(|d| !d.is_ready()) {
            log.debug(&format!("ignoring {} ({})", device.serial, device.state));
        }
        let device = discovery::select_device(&devices, global.serial.as_deref(), ask)?;
        log.info(&format!("device: {device}"));

        let shell = Arc::new(AdbShell::new(
            executor,
            global.adb.clone(),
            device.serial.clone(),
            Arc::clone(log) as Arc<dyn Log>,
            global.dry_run,
        ));
        Ok(Self { device, shell })
    }

    /// Build the engine context for this device.
    #[must_use]
    pub fn context(
        &self,
        log: &Arc<Logger>,
        dry_run: bool,
        cancelled: Arc<AtomicBool>,
    ) -> Context {
        Context::new(
            Arc::clone(&self.shell) as Arc<dyn DeviceShell>,
            Arc::clone(log) as Arc<dyn Log>,
            dry_run,
        )
        .with_cancel_flag(cancelled)
    }
}

/// Load and validate the permissions file, logging any warnings.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, or does not parse.
pub fn load_permissions(path: &Path, log: &Logger) -> Result<Permissions> {
    log.stage("Loading configuration");
    let permissions =
        config::load(path).with_context(|| format!("loading {}", path.display()))?;
    log.info(&format!(
        "loaded {} entries from {}",
        permissions.len(),
        path.display()
    ));

    let warnings = permissions.validate();
    if !warnings.is_empty() {
        log.warn(&format!(
            "found {} configuration warning(s):",
            warnings.len()
        ));
        for warning in &warnings {
            log.warn(&format!("  [{}]: {}", warning.item, warning.message));
        }
    }

    Ok(permissions)
}

/// Install a Ctrl-C handler that sets the returned flag.
///
/// The running device command is interrupted with the process; the engine
/// stops before the next item.  A second Ctrl-C exits immediately.
pub fn interrupt_flag(log: &Logger) -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&flag);
    let installed = ctrlc::set_handler(move || {
        if handler_flag.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
    });
    if let Err(e) = installed {
        log.warn(&format!("Ctrl-C handling unavailable: {e}"));
    }
    flag
}
