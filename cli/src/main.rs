//! `dotstow` binary entry point.
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use dotstow_cli::cli::Cli;
use dotstow_cli::error::DeployError;
use dotstow_cli::{commands, logging, style};

/// Exit status used when the run is interrupted with Ctrl-C.
const INTERRUPTED: i32 = 130;

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Cli::command(), "dotstow", &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    let color = style::color_enabled();
    logging::init_subscriber(args.verbose, "deploy", color);
    let log = logging::Logger::new("deploy", color);

    if let Err(e) = ctrlc::set_handler(|| std::process::exit(INTERRUPTED)) {
        log.warn(&format!("cannot install Ctrl-C handler: {e}"));
    }

    match commands::deploy::run(&args, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            let code = e
                .downcast_ref::<DeployError>()
                .map_or(1, DeployError::exit_code);
            ExitCode::from(code)
        }
    }
}
