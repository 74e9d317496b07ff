//! KMB CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use kmb_cli::{
    Args,
    error_adapter::{render, to_reportables, warning_reportables},
};

fn main() {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting KMB");
    debug!(args:?; "Parsed arguments");

    match kmb_cli::run(&args) {
        Ok(report) => {
            // Warnings are part of the result and bypass the log filter
            for reportable in warning_reportables(&report) {
                eprintln!("{}", render(&reportable));
            }
            println!("{}", report.path().display());
        }
        Err(err) => {
            // Render each diagnostic independently
            for reportable in to_reportables(&err) {
                error!("{}", render(&reportable));
            }

            process::exit(1);
        }
    }

    info!("Completed successfully");
}
