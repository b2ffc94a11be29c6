//! bpmnport CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use bpmnport_cli::{Args, error_adapter::render_report};

fn main() {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    let args = Args::parse();

    // Initialize the logger with the requested level
    let requested_level = args.effective_log_level();
    let log_level = LevelFilter::from_str(requested_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {requested_level}. Using 'warn' instead.");
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting bpmnport");
    debug!(args:?; "Parsed arguments");

    match bpmnport_cli::run(&args) {
        Ok(summary) => info!("Completed: {summary}"),
        Err(err) => {
            error!(path = args.input; "{}", render_report(&err));
            process::exit(1);
        }
    }
}
