//! dramadesk - Operator CLI for the dramadesk content toolkit.
//!
//! A thin wrapper over the dramadesk libraries for managing movies,
//! subscription packages, users and drama videos from a terminal.

mod cli;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Config(cmd) => commands::config::handle(cmd).await,
        Commands::Movies(cmd) => commands::movies::handle(cmd).await,
        Commands::Packages(cmd) => commands::packages::handle(cmd).await,
        Commands::Users(cmd) => commands::users::handle(cmd).await,
        Commands::Videos(cmd) => commands::videos::handle(cmd).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
