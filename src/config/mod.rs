//! Configuration management for vodsync

mod io;
mod types;

pub use types::*;

use anyhow::{bail, Result};
use std::env;
use std::path::PathBuf;

impl Config {
    /// Get the config file path (~/.config/vodsync/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        io::config_path()
    }

    /// Get the config directory path (~/.config/vodsync)
    pub fn config_dir() -> Result<PathBuf> {
        io::config_dir()
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Result<Self> {
        io::load()
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        io::save(self)
    }

    /// Expand ~ in the staging directory path
    pub fn staging_directory(&self) -> PathBuf {
        let dir = &self.staging.directory;
        if let Some(stripped) = dir.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        }
        PathBuf::from(dir)
    }

    /// Path of the progress marker file (~/.config/vodsync/last_vod_id)
    pub fn marker_path() -> Result<PathBuf> {
        Ok(io::config_dir()?.join("last_vod_id"))
    }

    /// Check the settings a mirroring run cannot start without.
    pub fn validate_for_run(&self) -> Result<()> {
        if self.source.channel.trim().is_empty() {
            bail!(
                "No source channel configured. Set [source].channel in {:?}",
                Self::config_path()?
            );
        }
        if self.retrieval.qualities.is_empty() {
            bail!("Quality ladder is empty. Set [retrieval].qualities");
        }
        Ok(())
    }
}

/// API credentials, read once from the environment at startup and passed
/// explicitly to the clients that need them. No component reads ambient
/// process state after construction.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub twitch_client_id: String,
    pub twitch_client_secret: String,
    pub youtube_client_id: String,
    pub youtube_client_secret: String,
    pub youtube_refresh_token: String,
}

impl Credentials {
    /// Read all required credentials, naming the first missing variable.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            twitch_client_id: required_var("TWITCH_CLIENT_ID")?,
            twitch_client_secret: required_var("TWITCH_CLIENT_SECRET")?,
            youtube_client_id: required_var("YOUTUBE_CLIENT_ID")?,
            youtube_client_secret: required_var("YOUTUBE_CLIENT_SECRET")?,
            youtube_refresh_token: required_var("YOUTUBE_REFRESH_TOKEN")?,
        })
    }
}

fn required_var(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => bail!("Missing required environment variable: {}", name),
    }
}
