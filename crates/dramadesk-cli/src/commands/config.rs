//! Config command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};

use dramadesk_core::BackendUrl;
use dramadesk_file::FileTable;

use crate::config::storage::{self, StoredConfig};
use crate::output;

#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Save backend settings
    Set(SetArgs),

    /// Display the effective settings
    Show(ShowArgs),

    /// Print the config file location
    Path,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Database URL (https://... for PostgREST, file://... for local tables)
    #[arg(long, conflicts_with = "database_dir")]
    pub database_url: Option<String>,

    /// Local directory to keep tables in (shorthand for a file:// URL)
    #[arg(long)]
    pub database_dir: Option<PathBuf>,

    /// Database API key
    #[arg(long)]
    pub database_key: Option<String>,

    /// Video management API base URL
    #[arg(long)]
    pub api_url: Option<String>,

    /// Bearer token for the video management API
    #[arg(long)]
    pub api_token: Option<String>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Show secrets in full
    #[arg(long)]
    pub reveal: bool,
}

pub async fn handle(cmd: ConfigCommand) -> Result<()> {
    match cmd.command {
        ConfigSubcommand::Set(args) => set(args),
        ConfigSubcommand::Show(args) => show(args),
        ConfigSubcommand::Path => {
            println!("{}", storage::config_path()?.display());
            Ok(())
        }
    }
}

fn set(args: SetArgs) -> Result<()> {
    let database_url = match (args.database_url, args.database_dir) {
        (Some(url), _) => Some(url),
        (None, Some(dir)) => {
            let table = FileTable::open(&dir)
                .with_context(|| format!("Invalid database directory {}", dir.display()))?;
            Some(table.url().to_string())
        }
        (None, None) => None,
    };

    let update = StoredConfig {
        database_url,
        database_key: args.database_key,
        api_url: args.api_url,
        api_token: args.api_token,
    };

    if update == StoredConfig::default() {
        bail!("Nothing to set. Pass at least one of --database-url, --database-dir, --database-key, --api-url, --api-token.");
    }

    if let Some(url) = &update.database_url {
        BackendUrl::new(url).context("Invalid database URL")?;
    }
    if let Some(url) = &update.api_url {
        let url = BackendUrl::new(url).context("Invalid API URL")?;
        if !url.is_network() {
            bail!("The video API URL must be http:// or https://");
        }
    }

    let mut config = storage::load_config()?;
    config.merge(update);
    let path = storage::save_config(&config).context("Failed to save config")?;

    output::field("Config", &path.display().to_string());
    output::success("Settings saved");

    Ok(())
}

fn show(args: ShowArgs) -> Result<()> {
    let config = storage::effective_config()?;
    let secret = |value: &Option<String>| match value {
        Some(v) if args.reveal => v.clone(),
        Some(v) => output::redact(v),
        None => "(not set)".to_string(),
    };
    let plain = |value: &Option<String>| value.clone().unwrap_or_else(|| "(not set)".to_string());

    output::field("Database URL", &plain(&config.database_url));
    output::field("Database key", &secret(&config.database_key));
    output::field("API URL", &plain(&config.api_url));
    output::field("API token", &secret(&config.api_token));

    let remote_database = config
        .database_url
        .as_deref()
        .is_some_and(|url| url.starts_with("http"));
    if remote_database && config.database_key.is_none() {
        output::warning("No database key set; PostgREST requests will be anonymous");
    }

    Ok(())
}
