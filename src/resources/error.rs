//! Typed error variants for device mutations.
//!
//! This module provides [`ResourceError`], a structured error type for
//! resource check and apply operations.  Internal resource code may return
//! these variants directly; callers convert to [`anyhow::Error`] via `?`.

use thiserror::Error;

/// Errors that arise from resource checks and apply operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// A device command exited non-zero.
    #[error("'{command}' failed (exit {exit_code}): {detail}")]
    CommandFailed {
        /// The device-side command line, without the adb prefix.
        command: String,
        /// Exit code returned by adb, `-1` when killed by a signal.
        exit_code: i32,
        /// Captured diagnostics (stderr, falling back to stdout).
        detail: String,
    },

    /// An identifier from the configuration cannot be sent to the device.
    #[error("invalid {kind} '{value}': {reason}")]
    InvalidIdentifier {
        /// What the identifier names (`"package"`, `"permission"`, …).
        kind: &'static str,
        /// The offending value.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The current device state could not be read before a merge.
    #[error("could not read {setting}: {reason}")]
    ReadFailed {
        /// Name of the device setting.
        setting: String,
        /// Human-readable reason.
        reason: String,
    },
}
