use crate::constants::{
    DEFAULT_ENDPOINT, DEFAULT_GREETING, DEFAULT_HISTORY_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS,
    ENDPOINT_ENV, LOG_LEVEL_ENV,
};
use crate::errors::{ChatError, ChatResult};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the chat server; `/chat` and `/history` are appended.
    pub endpoint: String,
    pub request_timeout_secs: u64,
    /// Cap for the startup `/history` fetch, which blocks the first frame.
    pub history_timeout_secs: u64,
    /// Shown as the first bot turn. `None` starts with an empty transcript.
    pub greeting: Option<String>,
    pub restore_history: bool,
    pub log_level: String,
    /// Where log files go. Defaults to the config directory.
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            history_timeout_secs: DEFAULT_HISTORY_TIMEOUT_SECS,
            greeting: Some(DEFAULT_GREETING.to_string()),
            restore_history: false,
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn history_timeout(&self) -> Duration {
        Duration::from_secs(self.history_timeout_secs)
    }

    pub fn resolved_log_dir(&self) -> ChatResult<PathBuf> {
        match &self.log_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(config_dir()?.join("logs")),
        }
    }

    /// Environment wins over the file so a `.env` can point at another server.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = env::var(ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                self.endpoint = endpoint.trim().to_string();
            }
        }
        if let Ok(level) = env::var(LOG_LEVEL_ENV) {
            if !level.trim().is_empty() {
                self.log_level = level.trim().to_lowercase();
            }
        }
    }
}

/// Loads the config from the default location, writing defaults on first
/// run, then applies environment overrides and validates the result.
///
/// This runs before logging starts, so the path of a freshly written
/// default file is returned for the caller to log.
pub fn initialize_config() -> ChatResult<(Config, Option<PathBuf>)> {
    let config_path = get_config_path()?;
    let (mut config, created) = load_or_create(&config_path)?;
    config.apply_env_overrides();
    validate_config(&config)?;
    Ok((config, created.then_some(config_path)))
}

/// Returns the config and whether the default file was just written.
pub fn load_or_create(path: &Path) -> ChatResult<(Config, bool)> {
    if path.exists() {
        return Ok((load_config(path)?, false));
    }

    let config = Config::default();
    save_config(path, &config)?;
    Ok((config, true))
}

pub fn load_config(path: &Path) -> ChatResult<Config> {
    let config_str = fs::read_to_string(path)
        .map_err(|e| ChatError::config_error(format!("Failed to read config file: {}", e)))?;

    serde_json::from_str(&config_str)
        .map_err(|e| ChatError::config_error(format!("Failed to parse config: {}", e)))
}

pub fn save_config(path: &Path, config: &Config) -> ChatResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            ChatError::config_error(format!("Failed to create config directory: {}", e))
        })?;
    }

    let config_str = serde_json::to_string_pretty(config)
        .map_err(|e| ChatError::config_error(format!("Failed to serialize config: {}", e)))?;

    fs::write(path, config_str)
        .map_err(|e| ChatError::config_error(format!("Failed to write config file: {}", e)))
}

fn config_dir() -> ChatResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| ChatError::config_error("Could not determine home directory"))?;

    Ok(home_dir.join(".config").join("chat-widget"))
}

pub fn get_config_path() -> ChatResult<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

pub fn validate_config(config: &Config) -> ChatResult<()> {
    let endpoint = config.endpoint.trim();
    if endpoint.is_empty() {
        return Err(ChatError::config_error("Endpoint is required"));
    }

    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        return Err(ChatError::config_error(format!(
            "Endpoint must be an http(s) URL, got {}",
            endpoint
        )));
    }

    if config.request_timeout_secs == 0 {
        return Err(ChatError::config_error(
            "request_timeout_secs must be greater than 0",
        ));
    }

    if config.history_timeout_secs == 0 {
        return Err(ChatError::config_error(
            "history_timeout_secs must be greater than 0",
        ));
    }

    if !LOG_LEVELS.contains(&config.log_level.as_str()) {
        return Err(ChatError::config_error(format!(
            "log_level must be one of {:?}",
            LOG_LEVELS
        )));
    }

    Ok(())
}
