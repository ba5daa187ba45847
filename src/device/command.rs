//! Typed adb requests and their translation to argument vectors.
use std::fmt;
use std::path::PathBuf;

/// Settings namespace holding the accessibility keys.
pub const SECURE_NAMESPACE: &str = "secure";

/// Colon-delimited list of enabled accessibility service components.
pub const ENABLED_ACCESSIBILITY_SERVICES: &str = "enabled_accessibility_services";

/// Device-wide accessibility master switch.
pub const ACCESSIBILITY_ENABLED: &str = "accessibility_enabled";

/// One request to the device-management tool.
///
/// Each variant is rendered to an argument vector at the process boundary
/// (see [`AdbCommand::args`]), so configuration values never pass through
/// a local shell.  Arguments forwarded to the device shell are quoted with
/// [`remote_quote`] because `adb shell` re-joins them into one command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdbCommand {
    /// `adb version`
    Version,
    /// `adb devices -l`
    Devices,
    /// `adb install <flags…> <apk>`
    Install { flags: Vec<String>, apk: PathBuf },
    /// `adb shell appops set --user current <package> <op…>`
    ///
    /// An operation descriptor such as `RUN_IN_BACKGROUND allow` is split on
    /// whitespace into separate arguments.
    AppOpsSet { package: String, operation: String },
    /// `adb shell pm grant --user current <package> <permission>`
    PmGrant { package: String, permission: String },
    /// `adb shell dumpsys deviceidle whitelist +<package>`
    DeviceIdleWhitelistAdd { package: String },
    /// `adb shell settings get <namespace> <key>`
    SettingsGet { namespace: String, key: String },
    /// `adb shell settings put <namespace> <key> <value>`
    SettingsPut {
        namespace: String,
        key: String,
        value: String,
    },
}

impl AdbCommand {
    /// Build an install request, splitting `flags` on whitespace.
    #[must_use]
    pub fn install(flags: &str, apk: impl Into<PathBuf>) -> Self {
        Self::Install {
            flags: flags.split_whitespace().map(String::from).collect(),
            apk: apk.into(),
        }
    }

    /// Read a key from the `secure` settings namespace.
    #[must_use]
    pub fn secure_get(key: &str) -> Self {
        Self::SettingsGet {
            namespace: SECURE_NAMESPACE.to_string(),
            key: key.to_string(),
        }
    }

    /// Write a key in the `secure` settings namespace.
    #[must_use]
    pub fn secure_put(key: &str, value: impl Into<String>) -> Self {
        Self::SettingsPut {
            namespace: SECURE_NAMESPACE.to_string(),
            key: key.to_string(),
            value: value.into(),
        }
    }

    /// Whether running this request changes device state.
    ///
    /// Only mutations are suppressed in dry-run mode; queries always run.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Self::Version | Self::Devices | Self::SettingsGet { .. }
        )
    }

    /// Whether this request targets a specific device (needs `-s <serial>`).
    #[must_use]
    pub const fn targets_device(&self) -> bool {
        !matches!(self, Self::Version | Self::Devices)
    }

    /// Render the request as adb arguments (without any `-s <serial>` prefix).
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::Version => vec!["version".to_string()],
            Self::Devices => vec!["devices".to_string(), "-l".to_string()],
            Self::Install { flags, apk } => {
                let mut args = vec!["install".to_string()];
                args.extend(flags.iter().cloned());
                args.push(apk.display().to_string());
                args
            }
            Self::AppOpsSet { package, operation } => {
                let mut remote = vec!["appops", "set", "--user", "current", package.as_str()];
                remote.extend(operation.split_whitespace());
                shell_args(remote)
            }
            Self::PmGrant {
                package,
                permission,
            } => shell_args([
                "pm",
                "grant",
                "--user",
                "current",
                package.as_str(),
                permission.as_str(),
            ]),
            Self::DeviceIdleWhitelistAdd { package } => {
                let target = format!("+{package}");
                shell_args(["dumpsys", "deviceidle", "whitelist", target.as_str()])
            }
            Self::SettingsGet { namespace, key } => {
                shell_args(["settings", "get", namespace.as_str(), key.as_str()])
            }
            Self::SettingsPut {
                namespace,
                key,
                value,
            } => shell_args([
                "settings",
                "put",
                namespace.as_str(),
                key.as_str(),
                value.as_str(),
            ]),
        }
    }
}

impl fmt::Display for AdbCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.args().join(" "))
    }
}

fn shell_args<'a>(remote: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    std::iter::once("shell".to_string())
        .chain(remote.into_iter().map(remote_quote))
        .collect()
}

/// Quote one argument for the device's `sh`.
///
/// Plain identifiers pass through untouched so the rendered command keeps
/// its usual shape; anything else is wrapped in single quotes.
#[must_use]
pub fn remote_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_./:+=,@%-".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn install_renders_flags_then_path() {
        let cmd = AdbCommand::install("-r -g", "/tmp/apk/MyApp_v1.2.apk");
        assert_eq!(cmd.to_string(), "install -r -g /tmp/apk/MyApp_v1.2.apk");
    }

    #[test]
    fn install_with_empty_flags() {
        let cmd = AdbCommand::install("", "/tmp/a.apk");
        assert_eq!(cmd.args(), vec!["install", "/tmp/a.apk"]);
    }

    #[test]
    fn appops_splits_operation_descriptor() {
        let cmd = AdbCommand::AppOpsSet {
            package: "com.example.app".to_string(),
            operation: "RUN_IN_BACKGROUND allow".to_string(),
        };
        assert_eq!(
            cmd.to_string(),
            "shell appops set --user current com.example.app RUN_IN_BACKGROUND allow"
        );
    }

    #[test]
    fn pm_grant_shape() {
        let cmd = AdbCommand::PmGrant {
            package: "com.example.app".to_string(),
            permission: "android.permission.CAMERA".to_string(),
        };
        assert_eq!(
            cmd.to_string(),
            "shell pm grant --user current com.example.app android.permission.CAMERA"
        );
    }

    #[test]
    fn deviceidle_shape() {
        let cmd = AdbCommand::DeviceIdleWhitelistAdd {
            package: "com.example.app".to_string(),
        };
        assert_eq!(
            cmd.to_string(),
            "shell dumpsys deviceidle whitelist +com.example.app"
        );
    }

    #[test]
    fn settings_shapes() {
        assert_eq!(
            AdbCommand::secure_get(ENABLED_ACCESSIBILITY_SERVICES).to_string(),
            "shell settings get secure enabled_accessibility_services"
        );
        assert_eq!(
            AdbCommand::secure_put(
                ENABLED_ACCESSIBILITY_SERVICES,
                "com.a/.Svc:com.b/.Other"
            )
            .to_string(),
            "shell settings put secure enabled_accessibility_services com.a/.Svc:com.b/.Other"
        );
        assert_eq!(
            AdbCommand::secure_put(ACCESSIBILITY_ENABLED, "1").to_string(),
            "shell settings put secure accessibility_enabled 1"
        );
    }

    #[test]
    fn inner_class_service_is_quoted() {
        let cmd = AdbCommand::secure_put(
            ENABLED_ACCESSIBILITY_SERVICES,
            "com.a/com.a.Outer$Inner",
        );
        assert_eq!(
            cmd.args().last().unwrap(),
            "'com.a/com.a.Outer$Inner'"
        );
    }

    #[test]
    fn remote_quote_cases() {
        assert_eq!(remote_quote("android.permission.CAMERA"), "android.permission.CAMERA");
        assert_eq!(remote_quote(""), "''");
        assert_eq!(remote_quote("a b"), "'a b'");
        assert_eq!(remote_quote("it's"), r"'it'\''s'");
        assert_eq!(remote_quote("x;reboot"), "'x;reboot'");
    }

    #[test]
    fn mutation_classification() {
        assert!(!AdbCommand::Version.is_mutation());
        assert!(!AdbCommand::Devices.is_mutation());
        assert!(!AdbCommand::secure_get(ENABLED_ACCESSIBILITY_SERVICES).is_mutation());
        assert!(AdbCommand::secure_put(ACCESSIBILITY_ENABLED, "1").is_mutation());
        assert!(AdbCommand::install("-r", "/x.apk").is_mutation());
    }

    #[test]
    fn host_commands_do_not_target_device() {
        assert!(!AdbCommand::Version.targets_device());
        assert!(!AdbCommand::Devices.targets_device());
        assert!(AdbCommand::secure_get(ACCESSIBILITY_ENABLED).targets_device());
    }
}
