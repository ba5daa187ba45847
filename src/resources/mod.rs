//! Device mutation primitives, one per install or grant step.
//!
//! Each grant step and each install is one resource bound to a
//! [`DeviceShell`](crate::device::DeviceShell).  Resources never log and never
//! decide whether a failure is fatal; callers collect their results.
pub mod accessibility;
pub mod apk;
pub mod appops;
pub mod deviceidle;
pub mod error;
pub mod permission;

pub use error::ResourceError;

/// Interface for resources that can be described and applied.
///
/// The device effect of a mutation is never read back; `apply` succeeding
/// means the device tool accepted the command.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Apply the resource change.
    ///
    /// # Errors
    ///
    /// Returns an error if a device command fails or a required read of
    /// device state fails.
    fn apply(&self) -> Result<ResourceChange, ResourceError>;
}

/// Result of applying a resource change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// The mutation was issued.
    Applied,
    /// The device already matched; the mutation was still issued where it is
    /// idempotent.
    AlreadyCorrect,
}

/// Reject identifiers that cannot name a package, permission, or component.
///
/// # Errors
///
/// Returns [`ResourceError::InvalidIdentifier`] for empty values, values with
/// whitespace or control characters, and values starting with `-` (which the
/// device tools would parse as an option).
pub fn check_identifier(kind: &'static str, value: &str) -> Result<(), ResourceError> {
    let reason = if value.is_empty() {
        Some("is empty")
    } else if value.chars().any(char::is_whitespace) {
        Some("contains whitespace")
    } else if value.chars().any(char::is_control) {
        Some("contains control characters")
    } else if value.starts_with('-') {
        Some("starts with '-'")
    } else {
        None
    };
    reason.map_or(Ok(()), |reason| {
        Err(ResourceError::InvalidIdentifier {
            kind,
            value: value.to_string(),
            reason,
        })
    })
}
