//! Runtime permission grant resource.
use super::{Applicable, ResourceChange, ResourceError, check_identifier};
use crate::device::{AdbCommand, DeviceShell};

/// `pm grant --user current <package> <permission>`
#[derive(Debug)]
pub struct PermissionGrantResource<'a> {
    package: String,
    permission: String,
    shell: &'a dyn DeviceShell,
}

impl<'a> PermissionGrantResource<'a> {
    /// Create a grant of `permission` to `package`.
    #[must_use]
    pub fn new(package: &str, permission: &str, shell: &'a dyn DeviceShell) -> Self {
        Self {
            package: package.to_string(),
            permission: permission.trim().to_string(),
            shell,
        }
    }
}

impl Applicable for PermissionGrantResource<'_> {
    fn description(&self) -> String {
        format!("pm grant {}", self.permission)
    }

    fn apply(&self) -> Result<ResourceChange, ResourceError> {
        check_identifier("package", &self.package)?;
        check_identifier("permission", &self.permission)?;
        self.shell.execute(&AdbCommand::PmGrant {
            package: self.package.clone(),
            permission: self.permission.clone(),
        })?;
        Ok(ResourceChange::Applied)
    }
}
