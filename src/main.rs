//! `greeble` command-line entry point.
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use greeble_cli::cli::{Cli, Command};
use greeble_cli::commands;
use greeble_cli::error::{GreebleError, ManifestError, ScaffoldError, VALIDATION_EXIT_CODE};
use greeble_cli::logging::{Logger, init_subscriber};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    init_subscriber(args.verbose, args.command.name());
    let log = Logger::new(args.command.name());

    match dispatch(&args, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log.error(&format!("{err:#}"));
            ExitCode::from(exit_code(&err))
        }
    }
}

fn dispatch(args: &Cli, log: &Logger) -> Result<()> {
    match &args.command {
        Command::List(opts) => commands::list::run(&args.global, opts, log),
        Command::Add(opts) => commands::add::run(&args.global, opts, log),
        Command::Sync(opts) => commands::sync::run(&args.global, opts, log),
        Command::Remove(opts) => commands::remove::run(&args.global, opts, log),
        Command::New(opts) => commands::new::run(&args.global, opts, log),
        Command::Doctor(opts) => commands::doctor::run(&args.global, opts, log),
    }
}

/// Manifest and scaffold failures exit with 2, everything else with 1.
fn exit_code(err: &anyhow::Error) -> u8 {
    let typed = err.chain().any(|cause| {
        cause.is::<GreebleError>() || cause.is::<ManifestError>() || cause.is::<ScaffoldError>()
    });
    if typed { VALIDATION_EXIT_CODE } else { 1 }
}
