//! Domain-specific error types for the provisioning engine.
//!
//! Internal modules return typed errors (e.g., [`ConfigError`], [`DeviceError`])
//! while command handlers at the CLI boundary convert them to [`anyhow::Error`]
//! via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! ProvisionError
//! ├── Config(ConfigError)     : permissions file loading and parsing
//! ├── Device(DeviceError)     : adb discovery and device selection
//! └── Resource(ResourceError) : a single device mutation
//! ```

use thiserror::Error;

pub use crate::resources::error::ResourceError;

/// Top-level error type for the provisioning engine.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Configuration-related error (missing file, syntax, I/O).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Device discovery or selection error.
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    /// A device mutation could not be performed.
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),
}

/// Errors that arise from loading the permissions configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("configuration file not found: {0}")]
    NotFound(String),

    /// The file extension does not name a supported format.
    #[error("unsupported configuration format '{extension}' for {path} (expected .json or .toml)")]
    UnsupportedFormat {
        /// Path of the offending file.
        path: String,
        /// Extension that was found (may be empty).
        extension: String,
    },

    /// The file could not be parsed.
    #[error("invalid syntax in {file}: {message}")]
    InvalidSyntax {
        /// Path of the file that failed to parse.
        file: String,
        /// Parser diagnostic.
        message: String,
    },

    /// An I/O error occurred while reading the file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise before any workflow starts: adb availability and
/// device selection.
#[derive(Error, Debug)]
pub enum DeviceError {
    /// The adb executable could not be found or run.
    #[error("adb not available at '{program}': {reason}")]
    AdbUnavailable {
        /// Program name or path that was tried.
        program: String,
        /// Human-readable reason.
        reason: String,
    },

    /// `adb devices` reported no device in the `device` state.
    #[error("no devices connected")]
    NoDevices,

    /// The requested serial is not among the connected devices.
    #[error("device '{0}' is not connected")]
    UnknownSerial(String),

    /// The interactive selection was not a listed choice.
    #[error("invalid selection: {0}")]
    InvalidSelection(String),
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn config_error_not_found_display() {
        let e = ConfigError::NotFound("permissions.json".to_string());
        assert_eq!(
            e.to_string(),
            "configuration file not found: permissions.json"
        );
    }

    #[test]
    fn config_error_unsupported_format_display() {
        let e = ConfigError::UnsupportedFormat {
            path: "grants.yaml".to_string(),
            extension: "yaml".to_string(),
        };
        assert!(e.to_string().contains("'yaml'"));
        assert!(e.to_string().contains(".json or .toml"));
    }

    #[test]
    fn config_error_io_has_source() {
        use std::error::Error as StdError;
        let e = ConfigError::Io {
            path: "/conf/permissions.json".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert!(e.to_string().contains("/conf/permissions.json"));
        assert!(e.source().is_some());
    }

    #[test]
    fn device_error_display() {
        assert_eq!(DeviceError::NoDevices.to_string(), "no devices connected");
        assert_eq!(
            DeviceError::UnknownSerial("emulator-5554".to_string()).to_string(),
            "device 'emulator-5554' is not connected"
        );
        let e = DeviceError::AdbUnavailable {
            program: "adb".to_string(),
            reason: "not found on PATH".to_string(),
        };
        assert!(e.to_string().contains("not found on PATH"));
    }

    #[test]
    fn provision_error_from_config_error() {
        let e: ProvisionError = ConfigError::NotFound("x.json".to_string()).into();
        assert!(e.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn provision_error_from_device_error() {
        let e: ProvisionError = DeviceError::NoDevices.into();
        assert_eq!(e.to_string(), "Device error: no devices connected");
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<ProvisionError>();
        assert_send_sync::<ConfigError>();
        assert_send_sync::<DeviceError>();
    }

    #[test]
    fn device_error_converts_to_anyhow() {
        let _anyhow_err: anyhow::Error = DeviceError::NoDevices.into();
    }
}
