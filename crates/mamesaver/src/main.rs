//! Screensaver that rotates through working MAME games

use clap::Parser;
use cli::{handle_cli, Cli};
use config::GlobalConfig;
use std::{
    fmt::Display,
    io::{self, Write},
    process::ExitCode,
};

mod cli;
mod config;
mod error;
mod game;
mod mame;
mod process;
mod rotation;
mod runtime;

fn main() -> ExitCode {
    // Stdout belongs to the display
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    tracing::info!("mamesaver v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = GlobalConfig::load_or_default();

    match handle_cli(cli.action.unwrap_or_default(), config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_failure(&err, &mut io::stderr().lock());
            ExitCode::FAILURE
        }
    }
}

fn report_failure(err: &dyn Display, out: &mut impl Write) {
    tracing::error!("{}", err);
    let _ = writeln!(out, "Error: {}", err);
}
