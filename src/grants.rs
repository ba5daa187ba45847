//! Applies one [`GrantBundle`] to one package.
//!
//! Steps run in a fixed order: app-ops, runtime permissions, the device-idle
//! allowlist, then accessibility services.  Every step is independent; a
//! failing step is logged and recorded in the [`GrantReport`] and the
//! remaining steps still run.
use crate::config::GrantBundle;
use crate::device::DeviceShell;
use crate::logging::Log;
use crate::resources::accessibility::AccessibilityResource;
use crate::resources::appops::AppOpResource;
use crate::resources::deviceidle::DeviceIdleResource;
use crate::resources::permission::PermissionGrantResource;
use crate::resources::{Applicable, ResourceChange, ResourceError, check_identifier};

/// Outcome of one grant step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// What the step did, e.g. `pm grant android.permission.CAMERA`.
    pub step: String,
    /// Failure reason; `None` when the device accepted the step.
    pub failure: Option<String>,
}

impl StepOutcome {
    /// Whether the step succeeded.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

/// Per-package record of every grant step that ran.
///
/// # Examples
///
/// ```
/// use apk_provisioner::grants::{GrantReport, StepOutcome};
///
/// let report = GrantReport {
///     package: "com.example.app".into(),
///     steps: vec![
///         StepOutcome { step: "pm grant android.permission.CAMERA".into(), failure: None },
///         StepOutcome { step: "pm grant BOGUS".into(), failure: Some("exit 255".into()) },
///     ],
/// };
///
/// assert!(!report.is_clean());
/// assert_eq!(report.failed_summary(), "pm grant BOGUS");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantReport {
    /// Package the bundle was applied to.
    pub package: String,
    /// One entry per step, in execution order.
    pub steps: Vec<StepOutcome>,
}

impl GrantReport {
    /// Whether every step succeeded (vacuously true with no steps).
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.steps.iter().all(StepOutcome::succeeded)
    }

    /// Steps that failed, in execution order.
    pub fn failed_steps(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|s| !s.succeeded())
    }

    /// Comma-separated names of the failed steps, for the run summary.
    #[must_use]
    pub fn failed_summary(&self) -> String {
        self.failed_steps()
            .map(|s| s.step.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Applies grant bundles through one device shell.
#[derive(Debug)]
pub struct GrantApplier<'a> {
    shell: &'a dyn DeviceShell,
    log: &'a dyn Log,
}

impl<'a> GrantApplier<'a> {
    #[must_use]
    pub const fn new(shell: &'a dyn DeviceShell, log: &'a dyn Log) -> Self {
        Self { shell, log }
    }

    /// Apply `bundle` to `package`.
    ///
    /// Step failures never abort the bundle; they are collected in the
    /// returned report.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidIdentifier`] if `package` cannot be
    /// sent to the device; no step runs in that case.
    pub fn apply(&self, package: &str, bundle: &GrantBundle) -> Result<GrantReport, ResourceError> {
        check_identifier("package", package)?;

        let mut steps: Vec<Box<dyn Applicable + 'a>> = Vec::new();
        for operation in &bundle.appops {
            steps.push(Box::new(AppOpResource::new(package, operation, self.shell)));
        }
        for permission in &bundle.pm_grants {
            steps.push(Box::new(PermissionGrantResource::new(
                package, permission, self.shell,
            )));
        }
        if bundle.deviceidle_whitelist {
            steps.push(Box::new(DeviceIdleResource::new(package, self.shell)));
        }
        if !bundle.accessibility_services.is_empty() {
            steps.push(Box::new(AccessibilityResource::new(
                &bundle.accessibility_services,
                self.shell,
            )));
        }

        let mut report = GrantReport {
            package: package.to_string(),
            steps: Vec::with_capacity(steps.len()),
        };
        for step in &steps {
            report.steps.push(self.run_step(package, step.as_ref()));
        }
        Ok(report)
    }

    fn run_step(&self, package: &str, step: &dyn Applicable) -> StepOutcome {
        let description = step.description();
        self.log.info(&format!("{package}: {description}"));
        match step.apply() {
            Ok(ResourceChange::AlreadyCorrect) => {
                self.log.debug(&format!("{package}: {description} already in place"));
                StepOutcome {
                    step: description,
                    failure: None,
                }
            }
            Ok(ResourceChange::Applied) => StepOutcome {
                step: description,
                failure: None,
            },
            Err(e) => {
                self.log
                    .warn(&format!("{package}: {description} failed: {e}"));
                StepOutcome {
                    step: description,
                    failure: Some(e.to_string()),
                }
            }
        }
    }
}
