// Shared helpers for integration tests.
//
// Provides a temporary directory holding a permissions file and an apk
// directory, and a scripted adb stand-in that records every invocation so
// tests can assert on the exact device command sequence.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use apk_provisioner::cli::GlobalOpts;
use apk_provisioner::commands::CommandSetup;
use apk_provisioner::exec::{ExecResult, Executor};
use apk_provisioner::logging::Logger;

/// Serial reported by [`FakeAdb`] for its single ready device.
pub const SERIAL: &str = "emulator-5554";

/// The configuration used by the end-to-end scenarios.
pub const MY_APP_CONFIG: &str = r#"{
  "MyApp": {
    "package": "com.example.app",
    "pm_grants": ["android.permission.CAMERA"],
    "accessibility_services": ["com.example.app/.Svc"]
  }
}"#;

/// Scripted `adb` replacement.
///
/// Answers `version` and `devices -l` like a real adb with one emulator
/// attached and keeps the enabled accessibility services as live device
/// state: `settings put` replaces it and the next `settings get` returns
/// the new value.  Any invocation whose rendered arguments contain one of
/// the configured fragments fails.
#[derive(Debug)]
pub struct FakeAdb {
    calls: Mutex<Vec<String>>,
    devices: String,
    setting: Mutex<String>,
    failing: Vec<String>,
}

impl FakeAdb {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            devices: format!(
                "List of devices attached\n{SERIAL}          device product:sdk model:Pixel_7 transport_id:1\n"
            ),
            setting: Mutex::new("null".to_string()),
            failing: Vec::new(),
        }
    }

    /// Replace the `adb devices -l` output.
    pub fn with_devices(mut self, output: &str) -> Self {
        self.devices = output.to_string();
        self
    }

    /// Initial value of the enabled accessibility services setting.
    pub fn with_setting(self, value: &str) -> Self {
        *self.setting.lock().expect("setting lock") = value.to_string();
        self
    }

    /// Current value of the enabled accessibility services setting.
    pub fn setting(&self) -> String {
        self.setting.lock().expect("setting lock").clone()
    }

    /// Values written to the enabled accessibility services setting, in order.
    pub fn accessibility_writes(&self) -> Vec<String> {
        let prefix = "settings put secure enabled_accessibility_services ";
        self.calls()
            .iter()
            .filter_map(|c| c.split_once(prefix).map(|(_, value)| value.to_string()))
            .collect()
    }

    /// Fail every invocation containing `fragment`.
    pub fn failing_on(mut self, fragment: &str) -> Self {
        self.failing.push(fragment.to_string());
        self
    }

    /// Every invocation so far, rendered as `adb <args>`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Invocations that change device state.
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.contains(" install ") || (c.contains(" shell ") && !c.contains(" get ")))
            .collect()
    }

    fn reply(&self, rendered: &str, args: &[&str]) -> ExecResult {
        if self.failing.iter().any(|f| rendered.contains(f.as_str())) {
            return ExecResult {
                stdout: String::new(),
                stderr: "error: simulated failure".to_string(),
                success: false,
                code: Some(1),
            };
        }
        let stdout = match args {
            ["version"] => "Android Debug Bridge version 1.0.41\nVersion 35.0.1\n".to_string(),
            ["devices", "-l"] => self.devices.clone(),
            [.., "settings", "get", _, _] => format!("{}\n", self.setting()),
            [.., "settings", "put", _, "enabled_accessibility_services", value] => {
                *self.setting.lock().expect("setting lock") = (*value).to_string();
                String::new()
            }
            _ if args.contains(&"install") => "Performing Streamed Install\nSuccess\n".to_string(),
            _ => String::new(),
        };
        ExecResult {
            stdout,
            stderr: String::new(),
            success: true,
            code: Some(0),
        }
    }
}

impl Executor for FakeAdb {
    fn run(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        let result = self.run_unchecked(program, args)?;
        if !result.success {
            anyhow::bail!("{program} {} failed: {}", args.join(" "), result.stderr);
        }
        Ok(result)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        let rendered = format!("{program} {}", args.join(" "));
        self.calls.lock().expect("calls lock").push(rendered.clone());
        Ok(self.reply(&rendered, args))
    }

    fn which(&self, _: &str) -> bool {
        true
    }
}

/// An isolated provisioning workspace backed by a [`tempfile::TempDir`].
pub struct Fixture {
    pub root: tempfile::TempDir,
}

impl Fixture {
    pub fn config_path(&self) -> PathBuf {
        self.root.path().join("permissions.json")
    }

    pub fn apk_dir(&self) -> PathBuf {
        self.root.path().join("apk")
    }

    /// Global options pointing at this workspace.
    pub fn global(&self, dry_run: bool) -> GlobalOpts {
        GlobalOpts {
            dry_run,
            serial: None,
            config: self.config_path(),
            apk_dir: self.apk_dir(),
            adb: "adb".to_string(),
            timeout: None,
        }
    }

    /// Replace the temporary apk directory with `<apk>` in `line`.
    pub fn redact(&self, line: &str) -> String {
        line.replace(&self.apk_dir().display().to_string(), "<apk>")
    }

    /// Select the device through `adb` and return the setup.
    pub fn setup(
        &self,
        adb: &Arc<FakeAdb>,
        global: &GlobalOpts,
        log: &Arc<Logger>,
    ) -> CommandSetup {
        CommandSetup::init_with(global, Arc::clone(adb) as Arc<dyn Executor>, log, |_| Ok(0))
            .expect("device setup")
    }
}

/// Fresh cancellation flag that is never set.
pub fn not_cancelled() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(false))
}

/// Fluent builder for [`Fixture`].
pub struct FixtureBuilder {
    fixture: Fixture,
}

impl FixtureBuilder {
    /// Begin with an empty permissions file and an empty apk directory.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(root.path().join("apk")).expect("create apk dir");
        std::fs::write(root.path().join("permissions.json"), "{}").expect("write config");
        Self {
            fixture: Fixture { root },
        }
    }

    /// Overwrite `permissions.json`.
    pub fn with_config(self, content: &str) -> Self {
        std::fs::write(self.fixture.config_path(), content).expect("write config");
        self
    }

    /// Create an (empty) artifact in the apk directory.
    pub fn with_apk(self, filename: &str) -> Self {
        write_file(&self.fixture.apk_dir(), filename);
        self
    }

    /// Finish building and return the fixture.
    pub fn build(self) -> Fixture {
        self.fixture
    }
}

fn write_file(dir: &Path, filename: &str) {
    std::fs::write(dir.join(filename), b"").expect("write artifact");
}
