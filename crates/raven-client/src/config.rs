//! Client configuration
//!
//! Layered from built-in defaults, an optional `raven.toml` in the user
//! config directory, an optional `raven.toml` in the working directory and
//! `RAVEN_*` environment variables, later sources winning.

use anyhow::Result;
use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
const DEFAULT_CHANNEL: &str = "general";
const LOCAL_CONFIG_FILE: &str = "raven.toml";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the Frappe site hosting Raven
    pub server_url: String,
    /// API key of the signed-in user
    pub api_key: Option<String>,
    /// API secret of the signed-in user
    pub api_secret: Option<String>,
    /// Identity of the signed-in user (usually an email address)
    pub current_user: String,
    /// Channel opened on startup; the last opened channel when unset
    pub channel_id: Option<String>,
}

impl ClientConfig {
    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("raven").join("raven.toml"))
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("server_url", DEFAULT_SERVER_URL)?
            .set_default("current_user", "Guest")?)
    }

    /// Load the configuration from all sources
    pub fn load() -> Result<Self> {
        Self::load_from(Self::user_config_path().as_deref(), Path::new(LOCAL_CONFIG_FILE))
    }

    fn load_from(user_config: Option<&Path>, local_config: &Path) -> Result<Self> {
        let mut builder = Self::defaults()?;

        if let Some(path) = user_config {
            builder = builder.add_source(File::from(path).required(false));
        }

        let config = builder
            .add_source(File::from(local_config).required(false))
            .add_source(Environment::with_prefix("RAVEN"))
            .build()?;

        let config: ClientConfig = config.try_deserialize()?;
        Ok(config.normalized())
    }

    /// Load defaults, falling back to them entirely when any source is broken
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load configuration, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Parse a TOML document layered over the defaults
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config = Self::defaults()?
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?;

        let config: ClientConfig = config.try_deserialize()?;
        Ok(config.normalized())
    }

    fn normalized(mut self) -> Self {
        while self.server_url.ends_with('/') {
            self.server_url.pop();
        }
        self
    }

    /// Channel to open: configured, then last opened, then the default channel
    pub fn startup_channel(&self, last_channel_id: Option<&str>) -> String {
        self.channel_id
            .as_deref()
            .or(last_channel_id)
            .unwrap_or(DEFAULT_CHANNEL)
            .to_string()
    }

    /// Value of the `Authorization` header, if API credentials are configured
    pub fn authorization(&self) -> Option<String> {
        match (&self.api_key, &self.api_secret) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Some(format!("token {}:{}", key, secret))
            }
            _ => None,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            api_key: None,
            api_secret: None,
            current_user: "Guest".to_string(),
            channel_id: None,
        }
    }
}
