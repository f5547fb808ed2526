//! Topograph CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use topograph::TopographError;
use topograph_cli::{Args, error_adapter::ErrorAdapter};

/// Installs the logger, treating an unknown level name as `warn`.
fn init_logging(level: &str) -> LevelFilter {
    let level = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Unknown log level `{level}`, falling back to `warn`");
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(level)
        .init();
    level
}

/// Logs `err` as a miette report with its diagnostic code and hint.
fn report(err: &TopographError) {
    let mut rendered = String::new();
    match miette::GraphicalReportHandler::new().render_report(&mut rendered, &ErrorAdapter(err)) {
        Ok(()) => error!("{rendered}"),
        Err(_) => error!("{err}"),
    }
}

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();
    let level = init_logging(&args.log_level);
    info!(level:?; "Topograph starting");
    debug!(args:?; "Parsed arguments");

    if let Err(err) = topograph_cli::run(&args) {
        report(&err);
        process::exit(1);
    }

    info!("Diagram written");
}
