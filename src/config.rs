use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::Monitor;

const ENV_PREFIX: &str = "UPTIME_SYNC_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to load config from environment: {0}")]
    Env(#[from] envy::Error),
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),
    #[error("No provider named '{0}' is configured")]
    UnknownProvider(String),
}

/// Credentials and defaults for one monitoring back-end account.
#[derive(Deserialize, Clone, Default)]
pub struct Provider {
    pub name: String,
    #[serde(default)]
    pub api_key: String,
    /// Base URL of the provider API. Empty means the provider's public endpoint.
    #[serde(default)]
    pub api_url: String,
    #[serde(default)]
    pub username: String,
    /// Comma-separated contact groups applied to monitors that do not name their own.
    #[serde(default)]
    pub alert_contacts: String,
}

// The API key stays out of logs.
impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("name", &self.name)
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("username", &self.username)
            .field("alert_contacts", &self.alert_contacts)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub providers: Vec<Provider>,
    /// Desired monitors, consumed by `apply`.
    pub monitors: Vec<Monitor>,
    pub enable_monitor_deletion: bool,
    pub cache_ttl_secs: u64,
    pub log_dir: String,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug)]
struct FileConfig {
    #[serde(default)]
    providers: Vec<Provider>,
    #[serde(default)]
    monitors: Vec<Monitor>,
    enable_monitor_deletion: Option<bool>,
    cache_ttl_secs: Option<u64>,
    log_dir: Option<String>,
}

#[derive(Deserialize, Default, Debug)]
struct EnvConfig {
    api_key: Option<String>,
    api_url: Option<String>,
    username: Option<String>,
    alert_contacts: Option<String>,
    enable_monitor_deletion: Option<bool>,
    cache_ttl_secs: Option<u64>,
    log_dir: Option<String>,
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl AppConfig {
    /// Loads the configuration file (when given and present), then lets
    /// `UPTIME_SYNC_*` environment variables override it.
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let file_config = match config_path {
            Some(path_str) if Path::new(path_str).exists() => {
                info!(path = %path_str, "Loading config file.");
                let contents = fs::read_to_string(path_str)?;
                toml::from_str(&contents)?
            }
            Some(path_str) => {
                debug!(path = %path_str, "Config file not found, relying on environment.");
                FileConfig::default()
            }
            None => FileConfig::default(),
        };

        let env_config: EnvConfig = envy::prefixed(ENV_PREFIX).from_env()?;

        Self::merge(file_config, env_config)
    }

    /// Parses a TOML document without consulting the environment.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Self::merge(toml::from_str(contents)?, EnvConfig::default())
    }

    // Environment overrides file
    fn merge(file: FileConfig, env: EnvConfig) -> Result<Self, ConfigError> {
        let mut providers = file.providers;
        if providers.is_empty() {
            return Err(ConfigError::Missing("providers"));
        }

        for provider in providers.iter_mut() {
            if let Some(api_key) = &env.api_key {
                provider.api_key = api_key.clone();
            }
            if let Some(api_url) = &env.api_url {
                provider.api_url = api_url.clone();
            }
            if let Some(username) = &env.username {
                provider.username = username.clone();
            }
            if let Some(alert_contacts) = &env.alert_contacts {
                provider.alert_contacts = alert_contacts.clone();
            }
        }

        Ok(AppConfig {
            providers,
            monitors: file.monitors,
            enable_monitor_deletion: env
                .enable_monitor_deletion
                .or(file.enable_monitor_deletion)
                .unwrap_or(false),
            cache_ttl_secs: env
                .cache_ttl_secs
                .or(file.cache_ttl_secs)
                .unwrap_or_else(default_cache_ttl_secs),
            log_dir: env.log_dir.or(file.log_dir).unwrap_or_else(default_log_dir),
        })
    }

    /// The provider with the given name, or the first configured one.
    pub fn provider(&self, name: Option<&str>) -> Result<&Provider, ConfigError> {
        match name {
            Some(name) => self
                .providers
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(name))
                .ok_or_else(|| ConfigError::UnknownProvider(name.to_string())),
            None => self.providers.first().ok_or(ConfigError::Missing("providers")),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
