//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::config::ConfigCommand;
use crate::commands::movies::MoviesCommand;
use crate::commands::packages::PackagesCommand;
use crate::commands::users::UsersCommand;
use crate::commands::videos::VideosCommand;

/// Content management for the streaming platform.
#[derive(Parser, Debug)]
#[command(name = "dramadesk")]
#[command(author, version = env!("DRAMADESK_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Backend connection settings
    Config(ConfigCommand),

    /// Movie catalogue
    Movies(MoviesCommand),

    /// Subscription packages
    Packages(PackagesCommand),

    /// Platform users and their subscriptions
    Users(UsersCommand),

    /// Drama videos in the video management service
    Videos(VideosCommand),
}
