use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the APK provisioner.
#[derive(Parser, Debug)]
#[command(
    name = "provision",
    about = "Install APKs and apply permission grants to an Android device",
    version
)]
pub struct Cli {
    /// Workflow to run; prompts for one when omitted
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Log device mutations instead of running them (queries still run)
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Serial of the device to provision (skips the device prompt)
    #[arg(short, long, global = true, env = "ANDROID_SERIAL")]
    pub serial: Option<String>,

    /// Permissions file (.json or .toml)
    #[arg(
        short,
        long,
        global = true,
        env = "PROVISION_CONFIG",
        default_value = "permissions.json"
    )]
    pub config: PathBuf,

    /// Directory containing the APKs to install
    #[arg(long, global = true, env = "PROVISION_APK_DIR", default_value = "apk")]
    pub apk_dir: PathBuf,

    /// adb executable (name on PATH or full path)
    #[arg(long, global = true, env = "ADB", default_value = "adb")]
    pub adb: String,

    /// Kill any single adb command running longer than this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Install every APK in the apk directory, then apply its grants
    Install,
    /// Apply grants to packages already installed on the device
    Apply,
    /// List the devices adb can see
    Devices,
}

impl Command {
    /// Name used for the log file.
    #[must_use]
    pub const fn log_name(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Apply => "apply",
            Self::Devices => "devices",
        }
    }
}
