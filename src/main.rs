use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use apk_provisioner::cli::{Cli, Command};
use apk_provisioner::commands;
use apk_provisioner::exec::{Executor, SystemExecutor};
use apk_provisioner::logging::{self, Logger, RunInfo};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let name = args.command.map_or("provision", Command::log_name);
    logging::init_subscriber(
        args.verbose,
        &RunInfo {
            command: name,
            config: &args.global.config,
            apk_dir: &args.global.apk_dir,
            dry_run: args.global.dry_run,
        },
    );
    let log = Arc::new(Logger::new(name));

    let executor: Arc<dyn Executor> = Arc::new(SystemExecutor::with_timeout(
        args.global.timeout.map(Duration::from_secs),
    ));

    let result = match args.command {
        Some(Command::Install) => commands::install::run(&args.global, executor, &log),
        Some(Command::Apply) => commands::apply::run(&args.global, executor, &log),
        Some(Command::Devices) => commands::devices::run(&args.global, executor.as_ref(), &log),
        None => commands::interactive::run(&args.global, executor, &log),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
