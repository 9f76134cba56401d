//! Config storage for persisting backend settings.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use dramadesk_core::BackendUrl;

use super::Settings;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

pub const DATABASE_URL_ENV: &str = "DRAMADESK_DATABASE_URL";
pub const DATABASE_KEY_ENV: &str = "DRAMADESK_DATABASE_KEY";
pub const API_URL_ENV: &str = "DRAMADESK_API_URL";
pub const API_TOKEN_ENV: &str = "DRAMADESK_API_TOKEN";

/// Stored config data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
}

impl StoredConfig {
    /// Overwrite the fields that are set in `other`.
    pub fn merge(&mut self, other: StoredConfig) {
        if other.database_url.is_some() {
            self.database_url = other.database_url;
        }
        if other.database_key.is_some() {
            self.database_key = other.database_key;
        }
        if other.api_url.is_some() {
            self.api_url = other.api_url;
        }
        if other.api_token.is_some() {
            self.api_token = other.api_token;
        }
    }

    /// Values taken from the environment.
    fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            database_url: var(DATABASE_URL_ENV),
            database_key: var(DATABASE_KEY_ENV),
            api_url: var(API_URL_ENV),
            api_token: var(API_TOKEN_ENV),
        }
    }
}

/// Get the config file path.
pub fn config_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "dramadesk").context("Could not determine config directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("config.json"))
}

/// Save the config to disk.
pub fn save_config(config: &StoredConfig) -> Result<PathBuf> {
    let path = config_path()?;
    let json = serde_json::to_string_pretty(config)?;

    fs::write(&path, &json).context("Failed to write config file")?;

    // Set restrictive permissions (Unix only)
    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;
    }

    Ok(path)
}

/// Load the stored config, or an empty one if none has been saved.
pub fn load_config() -> Result<StoredConfig> {
    let path = config_path()?;

    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file yet");
        return Ok(StoredConfig::default());
    }

    let json = fs::read_to_string(&path).context("Failed to read config file")?;
    serde_json::from_str(&json).context("Invalid config file")
}

/// Stored config with environment overrides applied.
pub fn effective_config() -> Result<StoredConfig> {
    let mut config = load_config()?;
    let overrides = StoredConfig::from_env();
    if overrides != StoredConfig::default() {
        tracing::debug!("Applying environment overrides");
    }
    config.merge(overrides);
    Ok(config)
}

/// Resolve the effective config into validated settings.
pub fn load_settings() -> Result<Settings> {
    let config = effective_config()?;

    let database_url = config
        .database_url
        .as_deref()
        .map(BackendUrl::new)
        .transpose()
        .context("Invalid database URL")?;
    let api_url = config
        .api_url
        .as_deref()
        .map(BackendUrl::new)
        .transpose()
        .context("Invalid API URL")?;

    Ok(Settings {
        database_url,
        database_key: config.database_key,
        api_url,
        api_token: config.api_token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_unset_fields() {
        let mut config = StoredConfig {
            database_url: Some("file:///tmp/a".into()),
            api_token: Some("t".into()),
            ..Default::default()
        };
        config.merge(StoredConfig {
            database_url: Some("https://abc.supabase.co".into()),
            ..Default::default()
        });
        assert_eq!(config.database_url.as_deref(), Some("https://abc.supabase.co"));
        assert_eq!(config.api_token.as_deref(), Some("t"));
    }

    #[test]
    fn empty_fields_are_not_written() {
        let json = serde_json::to_string(&StoredConfig {
            api_url: Some("https://api.example.com".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(json, r#"{"api_url":"https://api.example.com"}"#);
    }
}
