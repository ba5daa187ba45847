//! APK batch installer and permission-grant applier.
//!
//! Installs every APK in a directory onto one Android device over adb and
//! brings each installed package to the grant state described by a
//! permissions file: app-ops, runtime permissions, the battery-optimization
//! whitelist and enabled accessibility services.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: load and validate the permissions file
//! - **[`matcher`]**: pair APK filenames with configuration entries
//! - **[`device`]**: adb discovery, device selection and the command channel
//! - **[`resources`]**: one device mutation each (install, grant, …)
//! - **[`grants`]**: apply a whole bundle to one package
//! - **[`provision`]**: the install and apply-only workflows
//! - **[`commands`]**: top-level subcommand orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod device;
pub mod error;
pub mod exec;
pub mod grants;
pub mod logging;
pub mod matcher;
pub mod provision;
pub mod resources;
