//! Configuration file handling.
//!
//! This module provides loading and saving of osvhub configuration
//! from a TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/osvhub/config.toml`
//! - macOS: `~/Library/Application Support/osvhub/config.toml`
//! - Windows: `%APPDATA%\osvhub\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! feed_url = "https://osvhub.dev/data/osv.json"
//! audits_url = "https://osvhub.dev/data/audits.csv"
//! server_url = "https://hub.example.com"
//! session_token = "..."
//! default_format = "table"
//! timeout_seconds = 30
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Public disclosure feed fetched when no override is configured.
pub const DEFAULT_FEED_URL: &str = "https://osvhub.dev/data/osv.json";

/// Audit report CSV fetched when no override is configured.
pub const DEFAULT_AUDITS_URL: &str = "https://osvhub.dev/data/audits.csv";

/// Application configuration.
///
/// This struct represents all configurable options for osvhub.
/// It can be loaded from a TOML file or created with default values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL of the public disclosure feed.
    ///
    /// Default: [`DEFAULT_FEED_URL`]
    pub feed_url: String,

    /// URL of the audit report CSV.
    ///
    /// Default: [`DEFAULT_AUDITS_URL`]
    pub audits_url: String,

    /// Base URL of a hub server providing the authenticated feed.
    ///
    /// When unset, osvhub runs in public-only mode and never contacts
    /// a hub server.
    pub server_url: Option<String>,

    /// Session credential for the authenticated feed, obtained through
    /// the `login` command.
    pub session_token: Option<String>,

    /// Default output format when no `--format` flag is provided.
    ///
    /// Valid values: "table", "json"
    /// Default: "table"
    pub default_format: String,

    /// HTTP request timeout, in seconds.
    ///
    /// Default: 30
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            audits_url: DEFAULT_AUDITS_URL.to_string(),
            server_url: None,
            session_token: None,
            default_format: "table".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use osvhub::Config;
    ///
    /// let config = Config::load()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    ///
    /// # Example
    ///
    /// ```
    /// use osvhub::Config;
    ///
    /// let path = Config::config_path();
    /// println!("Config file: {}", path.display());
    /// ```
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("osvhub")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    ///
    /// This is useful for showing users what the default config looks like.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}
