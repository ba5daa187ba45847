//! Device-idle (Doze) allowlist resource.
use super::{Applicable, ResourceChange, ResourceError, check_identifier};
use crate::device::{AdbCommand, DeviceShell};

/// `dumpsys deviceidle whitelist +<package>`
#[derive(Debug)]
pub struct DeviceIdleResource<'a> {
    package: String,
    shell: &'a dyn DeviceShell,
}

impl<'a> DeviceIdleResource<'a> {
    #[must_use]
    pub fn new(package: &str, shell: &'a dyn DeviceShell) -> Self {
        Self {
            package: package.to_string(),
            shell,
        }
    }
}

impl Applicable for DeviceIdleResource<'_> {
    fn description(&self) -> String {
        "deviceidle whitelist".to_string()
    }

    fn apply(&self) -> Result<ResourceChange, ResourceError> {
        check_identifier("package", &self.package)?;
        self.shell.execute(&AdbCommand::DeviceIdleWhitelistAdd {
            package: self.package.clone(),
        })?;
        Ok(ResourceChange::Applied)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::FakeShell;

    #[test]
    fn apply_adds_package() {
        let shell = FakeShell::new();
        DeviceIdleResource::new("com.example.app", &shell)
            .apply()
            .unwrap();
        assert_eq!(
            shell.calls(),
            vec!["shell dumpsys deviceidle whitelist +com.example.app"]
        );
    }
}
