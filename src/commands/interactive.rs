use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::{CommandSetup, interrupt_flag, prompt};
use crate::cli::GlobalOpts;
use crate::exec::Executor;
use crate::logging::Logger;

/// Choice offered by the mode menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Install APKs, then apply their grants.
    Install,
    /// Apply grants to installed packages only.
    ApplyOnly,
    /// Leave without doing anything.
    Exit,
}

impl Mode {
    /// Menu entries in display order.
    pub const ALL: [Self; 3] = [Self::Install, Self::ApplyOnly, Self::Exit];

    const fn label(self) -> &'static str {
        match self {
            Self::Install => "Install APKs and apply permissions",
            Self::ApplyOnly => "Apply permissions only",
            Self::Exit => "Exit",
        }
    }

    /// Map a menu index to a mode.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Run interactively: select the device, then ask which workflow to run.
///
/// # Errors
///
/// Returns an error on any setup failure or an invalid menu choice; in both
/// cases no device work has been done.
pub fn run(global: &GlobalOpts, executor: Arc<dyn Executor>, log: &Arc<Logger>) -> Result<()> {
    let setup = CommandSetup::init(global, executor, log)?;

    let labels: Vec<String> = Mode::ALL.iter().map(|m| m.label().to_string()).collect();
    let index = prompt::prompt_select("Choose a mode:", &labels).context("mode selection")?;
    let mode = Mode::from_index(index).context("mode selection out of range")?;

    match mode {
        Mode::Install => {
            super::install::execute(global, &setup, log, interrupt_flag(log))?;
        }
        Mode::ApplyOnly => {
            super::apply::execute(global, &setup, log, interrupt_flag(log))?;
        }
        Mode::Exit => log.info("exiting"),
    }
    Ok(())
}
