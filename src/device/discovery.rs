//! adb availability checks, device enumeration and device selection.
use std::fmt;

use crate::error::DeviceError;
use crate::exec::Executor;

use super::command::AdbCommand;

/// State reported by `adb devices` for a usable device.
pub const READY_STATE: &str = "device";

/// One line of `adb devices -l` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSummary {
    /// Serial passed to `adb -s`.
    pub serial: String,
    /// Connection state (`device`, `unauthorized`, `offline`, …).
    pub state: String,
    /// Model name from the `model:` token, if reported.
    pub model: Option<String>,
}

impl DeviceSummary {
    /// Whether the device accepts commands.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state == READY_STATE
    }
}

impl fmt::Display for DeviceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.model {
            Some(model) => write!(f, "{} ({model})", self.serial),
            None => f.write_str(&self.serial),
        }
    }
}

/// Parse `adb devices [-l]` output.
///
/// The header line and daemon start-up chatter (lines starting with `*`)
/// are ignored, as is anything without at least a serial and a state.
#[must_use]
pub fn parse_devices(output: &str) -> Vec<DeviceSummary> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with('*'))
        .filter(|line| !line.to_lowercase().starts_with("list of devices"))
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            let serial = tokens.next()?.to_string();
            let state = tokens.next()?.to_string();
            let model = tokens
                .find_map(|token| token.strip_prefix("model:"))
                .map(String::from);
            Some(DeviceSummary {
                serial,
                state,
                model,
            })
        })
        .collect()
}

/// Verify that `program` exists and answers `adb version`.
///
/// # Errors
///
/// Returns [`DeviceError::AdbUnavailable`] if the program is not found or
/// the version query fails.
pub fn check_adb(executor: &dyn Executor, program: &str) -> Result<String, DeviceError> {
    if !executor.which(program) {
        return Err(DeviceError::AdbUnavailable {
            program: program.to_string(),
            reason: "not found on PATH".to_string(),
        });
    }
    let args = AdbCommand::Version.args();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let result = executor
        .run(program, &args)
        .map_err(|e| DeviceError::AdbUnavailable {
            program: program.to_string(),
            reason: format!("{e:#}"),
        })?;
    Ok(result.stdout.lines().next().unwrap_or_default().trim().to_string())
}

/// Enumerate all devices known to the adb server, in any state.
///
/// # Errors
///
/// Returns [`DeviceError::AdbUnavailable`] if `adb devices` fails.
pub fn list_devices(
    executor: &dyn Executor,
    program: &str,
) -> Result<Vec<DeviceSummary>, DeviceError> {
    let args = AdbCommand::Devices.args();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let result = executor
        .run(program, &args)
        .map_err(|e| DeviceError::AdbUnavailable {
            program: program.to_string(),
            reason: format!("{e:#}"),
        })?;
    Ok(parse_devices(&result.stdout))
}

/// Pick the device to provision.
///
/// With an explicit `serial` the device must be listed and ready.  With a
/// single ready device it is chosen without asking.  Otherwise `ask` is
/// called with the ready devices and must return an index into them.
///
/// # Errors
///
/// Returns [`DeviceError::NoDevices`] when nothing is ready,
/// [`DeviceError::UnknownSerial`] for an unlisted serial, or whatever `ask`
/// returns; an out-of-range index is [`DeviceError::InvalidSelection`].
pub fn select_device(
    devices: &[DeviceSummary],
    serial: Option<&str>,
    ask: impl FnOnce(&[DeviceSummary]) -> Result<usize, DeviceError>,
) -> Result<DeviceSummary, DeviceError> {
    let ready: Vec<DeviceSummary> = devices.iter().filter(|d| d.is_ready()).cloned().collect();

    if let Some(serial) = serial {
        return ready
            .into_iter()
            .find(|d| d.serial == serial)
            .ok_or_else(|| DeviceError::UnknownSerial(serial.to_string()));
    }

    match ready.as_slice() {
        [] => Err(DeviceError::NoDevices),
        [only] => Ok(only.clone()),
        many => {
            let index = ask(many)?;
            many.get(index)
                .cloned()
                .ok_or_else(|| DeviceError::InvalidSelection(index.to_string()))
        }
    }
}
