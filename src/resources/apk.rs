//! APK installation resource.
use std::path::{Path, PathBuf};

use super::{Applicable, ResourceChange, ResourceError};
use crate::device::{AdbCommand, DeviceShell};

/// One `adb install` of a local APK file.
#[derive(Debug)]
pub struct ApkInstallResource<'a> {
    apk: PathBuf,
    flags: String,
    shell: &'a dyn DeviceShell,
}

impl<'a> ApkInstallResource<'a> {
    /// Create an install of `apk` with the given whitespace-separated flags.
    #[must_use]
    pub fn new(apk: &Path, flags: &str, shell: &'a dyn DeviceShell) -> Self {
        Self {
            apk: apk.to_path_buf(),
            flags: flags.to_string(),
            shell,
        }
    }
}

impl Applicable for ApkInstallResource<'_> {
    fn description(&self) -> String {
        let name = self
            .apk
            .file_name()
            .map_or_else(|| self.apk.display().to_string(), |n| n.to_string_lossy().into_owned());
        format!("install {name}")
    }

    fn apply(&self) -> Result<ResourceChange, ResourceError> {
        self.shell
            .execute(&AdbCommand::install(&self.flags, &self.apk))?;
        Ok(ResourceChange::Applied)
    }
}
