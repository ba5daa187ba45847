//! The device command channel: one adb serial, typed requests in, results out.
pub mod command;
pub mod discovery;

use std::sync::Arc;

pub use command::AdbCommand;
pub use discovery::DeviceSummary;

use crate::exec::Executor;
use crate::logging::Log;
use crate::resources::error::ResourceError;

/// Capability to run requests against the selected device.
///
/// Constructed once after device selection and passed to everything that
/// talks to the device; there is no process-wide "current device".
#[cfg_attr(test, mockall::automock)]
pub trait DeviceShell {
    /// Run a request; `Ok` means adb reported success.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::CommandFailed`] if adb could not be run,
    /// timed out, or reported failure.
    fn execute(&self, command: &AdbCommand) -> Result<(), ResourceError>;

    /// Run a read-only request and return its trimmed standard output.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::CommandFailed`] on any failure; callers
    /// must not treat a failed read as an empty value.
    fn execute_captured(&self, command: &AdbCommand) -> Result<String, ResourceError>;
}

impl std::fmt::Debug for dyn DeviceShell + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<dyn DeviceShell>")
    }
}

/// [`DeviceShell`] that shells out to the adb executable.
pub struct AdbShell {
    executor: Arc<dyn Executor>,
    program: String,
    serial: String,
    log: Arc<dyn Log>,
    dry_run: bool,
}

impl std::fmt::Debug for AdbShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdbShell")
            .field("executor", &"<dyn Executor>")
            .field("program", &self.program)
            .field("serial", &self.serial)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl AdbShell {
    /// Bind `program` to the device `serial`.
    ///
    /// In dry-run mode mutations are logged instead of executed; queries
    /// still reach the device.
    #[must_use]
    pub fn new(
        executor: Arc<dyn Executor>,
        program: impl Into<String>,
        serial: impl Into<String>,
        log: Arc<dyn Log>,
        dry_run: bool,
    ) -> Self {
        Self {
            executor,
            program: program.into(),
            serial: serial.into(),
            log,
            dry_run,
        }
    }

    /// Serial of the device this shell talks to.
    #[must_use]
    pub fn serial(&self) -> &str {
        &self.serial
    }

    fn argv(&self, command: &AdbCommand) -> Vec<String> {
        let mut argv = Vec::new();
        if command.targets_device() {
            argv.push("-s".to_string());
            argv.push(self.serial.clone());
        }
        argv.extend(command.args());
        argv
    }

    fn run(&self, command: &AdbCommand) -> Result<crate::exec::ExecResult, ResourceError> {
        let argv = self.argv(command);
        self.log
            .debug(&format!(">>> {} {}", self.program, argv.join(" ")));
        let args: Vec<&str> = argv.iter().map(String::as_str).collect();
        let result = self
            .executor
            .run_unchecked(&self.program, &args)
            .map_err(|e| ResourceError::CommandFailed {
                command: command.to_string(),
                exit_code: -1,
                detail: format!("{e:#}"),
            })?;

        if result.success && !reports_failure(command, &result.stdout) {
            return Ok(result);
        }
        let detail = if result.stderr.trim().is_empty() {
            result.stdout.trim().to_string()
        } else {
            result.stderr.trim().to_string()
        };
        Err(ResourceError::CommandFailed {
            command: command.to_string(),
            exit_code: result.code.unwrap_or(-1),
            detail,
        })
    }
}

/// Older adb releases exit 0 from `install` and print `Failure [...]`.
fn reports_failure(command: &AdbCommand, stdout: &str) -> bool {
    matches!(command, AdbCommand::Install { .. })
        && stdout.lines().any(|l| l.trim_start().starts_with("Failure"))
}

impl DeviceShell for AdbShell {
    fn execute(&self, command: &AdbCommand) -> Result<(), ResourceError> {
        if self.dry_run && command.is_mutation() {
            self.log.dry_run(&format!(
                "would run: {} {}",
                self.program,
                self.argv(command).join(" ")
            ));
            return Ok(());
        }
        self.run(command).map(|_| ())
    }

    fn execute_captured(&self, command: &AdbCommand) -> Result<String, ResourceError> {
        self.run(command).map(|r| r.stdout.trim().to_string())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::exec::ExecResult;
    use crate::logging::Logger;
    use std::sync::Mutex;

    /// Records argv and replies with a scripted `(success, stdout)` per call.
    #[derive(Debug, Default)]
    struct ScriptedExecutor {
        calls: Mutex<Vec<Vec<String>>>,
        replies: Mutex<Vec<(bool, String)>>,
    }

    impl ScriptedExecutor {
        fn replying(replies: Vec<(bool, &str)>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                replies: Mutex::new(
                    replies
                        .into_iter()
                        .rev()
                        .map(|(ok, out)| (ok, out.to_string()))
                        .collect(),
                ),
            }
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Executor for ScriptedExecutor {
        fn run(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
            self.run_unchecked(program, args)
        }

        fn run_unchecked(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
            let mut argv = vec![program.to_string()];
            argv.extend(args.iter().map(|a| (*a).to_string()));
            self.calls.lock().unwrap().push(argv);
            let (success, stdout) = self
                .replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or((true, String::new()));
            Ok(ExecResult {
                stdout,
                stderr: if success { String::new() } else { "boom".to_string() },
                success,
                code: Some(i32::from(!success)),
            })
        }

        fn which(&self, _: &str) -> bool {
            true
        }
    }

    fn shell(executor: &Arc<ScriptedExecutor>, dry_run: bool) -> AdbShell {
        AdbShell::new(
            Arc::clone(executor) as Arc<dyn Executor>,
            "adb",
            "emulator-5554",
            Arc::new(Logger::new("test")),
            dry_run,
        )
    }

    #[test]
    fn execute_prefixes_serial() {
        let executor = Arc::new(ScriptedExecutor::default());
        let shell = shell(&executor, false);
        shell
            .execute(&AdbCommand::secure_put("accessibility_enabled", "1"))
            .unwrap();
        assert_eq!(
            executor.calls()[0].join(" "),
            "adb -s emulator-5554 shell settings put secure accessibility_enabled 1"
        );
    }

    #[test]
    fn host_commands_have_no_serial() {
        let executor = Arc::new(ScriptedExecutor::default());
        let shell = shell(&executor, false);
        shell.execute_captured(&AdbCommand::Version).unwrap();
        assert_eq!(executor.calls()[0], vec!["adb", "version"]);
    }

    #[test]
    fn execute_failure_carries_exit_code_and_stderr() {
        let executor = Arc::new(ScriptedExecutor::replying(vec![(false, "")]));
        let shell = shell(&executor, false);
        let err = shell
            .execute(&AdbCommand::PmGrant {
                package: "com.example".to_string(),
                permission: "android.permission.CAMERA".to_string(),
            })
            .unwrap_err();
        assert!(matches!(
            err,
            ResourceError::CommandFailed { exit_code: 1, ref detail, .. } if detail == "boom"
        ));
    }

    #[test]
    fn legacy_install_failure_on_stdout_is_failure() {
        let executor = Arc::new(ScriptedExecutor::replying(vec![(
            true,
            "Performing Streamed Install\nFailure [INSTALL_FAILED_VERSION_DOWNGRADE]\n",
        )]));
        let shell = shell(&executor, false);
        let err = shell
            .execute(&AdbCommand::install("-r -g", "/tmp/a.apk"))
            .unwrap_err();
        assert!(err.to_string().contains("INSTALL_FAILED_VERSION_DOWNGRADE"));
    }

    #[test]
    fn captured_output_is_trimmed() {
        let executor = Arc::new(ScriptedExecutor::replying(vec![(true, "a/.A:b/.B\n")]));
        let shell = shell(&executor, false);
        let out = shell
            .execute_captured(&AdbCommand::secure_get("enabled_accessibility_services"))
            .unwrap();
        assert_eq!(out, "a/.A:b/.B");
    }

    #[test]
    fn captured_failure_is_error_not_empty() {
        let executor = Arc::new(ScriptedExecutor::replying(vec![(false, "")]));
        let shell = shell(&executor, false);
        assert!(
            shell
                .execute_captured(&AdbCommand::secure_get("enabled_accessibility_services"))
                .is_err()
        );
    }

    #[test]
    fn dry_run_suppresses_mutations_but_not_queries() {
        let executor = Arc::new(ScriptedExecutor::default());
        let shell = shell(&executor, true);
        shell
            .execute(&AdbCommand::install("-r -g", "/tmp/a.apk"))
            .unwrap();
        assert!(executor.calls().is_empty(), "install must not run in dry-run");
        shell
            .execute_captured(&AdbCommand::secure_get("enabled_accessibility_services"))
            .unwrap();
        assert_eq!(executor.calls().len(), 1, "queries still run in dry-run");
    }

    #[test]
    fn serial_accessor() {
        let executor = Arc::new(ScriptedExecutor::default());
        assert_eq!(shell(&executor, false).serial(), "emulator-5554");
    }
}
