//! Accessibility service enablement resource.
//!
//! The device keeps enabled services in one colon-delimited secure setting.
//! Enabling is a read-merge-write of that setting followed by turning on the
//! accessibility master switch.  The read and the write are separate device
//! commands, so a concurrent external change between them can be lost.
use super::{Applicable, ResourceChange, ResourceError, check_identifier};
use crate::device::command::{ACCESSIBILITY_ENABLED, ENABLED_ACCESSIBILITY_SERVICES};
use crate::device::{AdbCommand, DeviceShell};

/// Value `settings get` prints for an unset key.
const UNSET_SENTINEL: &str = "null";

/// Parse the setting value into an ordered list of service components.
///
/// The `null` sentinel and empty output both mean no services are enabled.
#[must_use]
pub fn parse_enabled(value: &str) -> Vec<String> {
    let value = value.trim();
    if value == UNSET_SENTINEL {
        return Vec::new();
    }
    value
        .split(':')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Set-union of `current` and `requested`.
///
/// Existing entries keep their order; requested entries not yet present are
/// appended once each, in request order.
#[must_use]
pub fn merge_services(current: &[String], requested: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(current.len() + requested.len());
    for service in current.iter().chain(requested) {
        if !merged.contains(service) {
            merged.push(service.clone());
        }
    }
    merged
}

/// Enables a set of accessibility services on the device.
#[derive(Debug)]
pub struct AccessibilityResource<'a> {
    services: Vec<String>,
    shell: &'a dyn DeviceShell,
}

impl<'a> AccessibilityResource<'a> {
    /// Create a resource enabling `services` (blank entries are ignored).
    #[must_use]
    pub fn new(services: &[String], shell: &'a dyn DeviceShell) -> Self {
        Self {
            services: services
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            shell,
        }
    }

    fn read_current(&self) -> Result<Vec<String>, ResourceError> {
        let raw = self
            .shell
            .execute_captured(&AdbCommand::secure_get(ENABLED_ACCESSIBILITY_SERVICES))
            .map_err(|e| ResourceError::ReadFailed {
                setting: ENABLED_ACCESSIBILITY_SERVICES.to_string(),
                reason: e.to_string(),
            })?;
        Ok(parse_enabled(&raw))
    }
}

impl Applicable for AccessibilityResource<'_> {
    fn description(&self) -> String {
        format!("accessibility services {}", self.services.join(", "))
    }

    fn apply(&self) -> Result<ResourceChange, ResourceError> {
        for service in &self.services {
            check_identifier("accessibility service", service)?;
        }
        let current = self.read_current()?;
        let merged = merge_services(&current, &self.services);
        self.shell.execute(&AdbCommand::secure_put(
            ENABLED_ACCESSIBILITY_SERVICES,
            merged.join(":"),
        ))?;
        self.shell
            .execute(&AdbCommand::secure_put(ACCESSIBILITY_ENABLED, "1"))?;
        if merged == current {
            Ok(ResourceChange::AlreadyCorrect)
        } else {
            Ok(ResourceChange::Applied)
        }
    }
}
