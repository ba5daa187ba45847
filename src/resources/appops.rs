//! App-op mode resource.
use super::{Applicable, ResourceChange, ResourceError, check_identifier};
use crate::device::{AdbCommand, DeviceShell};

/// `appops set --user current <package> <operation...>`
#[derive(Debug)]
pub struct AppOpResource<'a> {
    package: String,
    operation: String,
    shell: &'a dyn DeviceShell,
}

impl<'a> AppOpResource<'a> {
    /// Create an app-op mutation; `operation` is a descriptor such as
    /// `RUN_IN_BACKGROUND allow`.
    #[must_use]
    pub fn new(package: &str, operation: &str, shell: &'a dyn DeviceShell) -> Self {
        Self {
            package: package.to_string(),
            operation: operation.to_string(),
            shell,
        }
    }
}

impl Applicable for AppOpResource<'_> {
    fn description(&self) -> String {
        format!("appops {}", self.operation.trim())
    }

    fn apply(&self) -> Result<ResourceChange, ResourceError> {
        if self.operation.trim().is_empty() {
            return Err(ResourceError::InvalidIdentifier {
                kind: "app-op",
                value: self.operation.clone(),
                reason: "is empty",
            });
        }
        check_identifier("package", &self.package)?;
        self.shell.execute(&AdbCommand::AppOpsSet {
            package: self.package.clone(),
            operation: self.operation.clone(),
        })?;
        Ok(ResourceChange::Applied)
    }
}
