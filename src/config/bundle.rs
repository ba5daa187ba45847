//! One application's grant instructions.
use serde::Deserialize;

/// Flags passed to `adb install` when an entry does not set its own.
pub const DEFAULT_INSTALL_FLAGS: &str = "-r -g";

fn default_install_flags() -> String {
    DEFAULT_INSTALL_FLAGS.to_string()
}

/// Device-side grant instructions for one logical application.
///
/// Loaded once and never mutated.  A bundle without a package identifier can
/// never be applied; it is reported and skipped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GrantBundle {
    /// Installed package identifier, e.g. `com.example.app`.
    #[serde(default)]
    pub package: Option<String>,
    /// Flags for `adb install` (install mode only).
    #[serde(default = "default_install_flags")]
    pub install_flags: String,
    /// App-op descriptors such as `RUN_IN_BACKGROUND allow`, in order.
    #[serde(default)]
    pub appops: Vec<String>,
    /// Runtime permissions to grant, in order.
    #[serde(default)]
    pub pm_grants: Vec<String>,
    /// Add the package to the device-idle allowlist.
    #[serde(default)]
    pub deviceidle_whitelist: bool,
    /// Accessibility service components to enable, in order.
    #[serde(default)]
    pub accessibility_services: Vec<String>,
}

impl Default for GrantBundle {
    fn default() -> Self {
        Self {
            package: None,
            install_flags: default_install_flags(),
            appops: Vec::new(),
            pm_grants: Vec::new(),
            deviceidle_whitelist: false,
            accessibility_services: Vec::new(),
        }
    }
}

impl GrantBundle {
    /// The package identifier, treating an empty or blank value as absent.
    #[must_use]
    pub fn package_id(&self) -> Option<&str> {
        self.package
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// Whether any of the four grant fields asks for device work.
    #[must_use]
    pub fn has_grant_work(&self) -> bool {
        !self.appops.is_empty()
            || !self.pm_grants.is_empty()
            || self.deviceidle_whitelist
            || !self.accessibility_services.is_empty()
    }
}
