use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::model::{DEFAULT_LEFT_MODEL, DEFAULT_RIGHT_MODEL};
use crate::paths::config_json_path;
use crate::session::DEFAULT_TITLE_CHARS;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Base URL of the backend-for-frontend API
    pub backend_url: String,
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Sent as `X-Internal-API-Key` when talking to the backends directly
    #[serde(default)]
    pub internal_api_key: Option<String>,
    #[serde(default = "default_left_model")]
    pub left_model: String,
    #[serde(default = "default_right_model")]
    pub right_model: String,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub quota: QuotaConfig,
    #[serde(default = "default_title_chars")]
    pub title_max_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    /// Retries for idempotent GET requests; chat POSTs are never retried
    pub max_retries: u32,
    pub retry_base_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 3,
            retry_base_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuotaConfig {
    pub warning_percent: u32,
    pub poll_interval_secs: u64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            warning_percent: 80,
            poll_interval_secs: 600,
        }
    }
}

const CONFIG_FILE_PATH: &str = "config.toml";
const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";

fn default_left_model() -> String {
    DEFAULT_LEFT_MODEL.to_string()
}

fn default_right_model() -> String {
    DEFAULT_RIGHT_MODEL.to_string()
}

fn default_title_chars() -> usize {
    DEFAULT_TITLE_CHARS
}

fn parse_env<T: std::str::FromStr>(key: &str, value: String) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            auth_token: None,
            internal_api_key: None,
            left_model: default_left_model(),
            right_model: default_right_model(),
            http: HttpConfig::default(),
            quota: QuotaConfig::default(),
            title_max_chars: DEFAULT_TITLE_CHARS,
        }
    }
}

impl Config {
    /// Defaults, then `~/.tellmemore/config.json` (or `./config.toml`),
    /// then environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        let mut loaded = false;
        let json_path = config_json_path();
        if json_path.exists() {
            let content = std::fs::read_to_string(&json_path)?;
            config = serde_json::from_str(&content)?;
            loaded = true;
            log::debug!("Loaded config from {}", json_path.display());
        }

        if !loaded && std::path::Path::new(CONFIG_FILE_PATH).exists() {
            let content = std::fs::read_to_string(CONFIG_FILE_PATH)?;
            config = toml::from_str(&content)?;
            log::debug!("Loaded config from {}", CONFIG_FILE_PATH);
        }

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `BACKEND_URL`, `AUTH_TOKEN`, `INTERNAL_API_KEY`, `LEFT_MODEL`,
    /// `RIGHT_MODEL`, `HTTP_TIMEOUT_SECS` and `HTTP_MAX_RETRIES`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("BACKEND_URL") {
            self.backend_url = url;
        }
        if let Some(token) = lookup("AUTH_TOKEN") {
            self.auth_token = Some(token);
        }
        if let Some(key) = lookup("INTERNAL_API_KEY") {
            self.internal_api_key = Some(key);
        }
        if let Some(model) = lookup("LEFT_MODEL") {
            self.left_model = model;
        }
        if let Some(model) = lookup("RIGHT_MODEL") {
            self.right_model = model;
        }
        if let Some(value) = lookup("HTTP_TIMEOUT_SECS") {
            self.http.timeout_secs = parse_env("HTTP_TIMEOUT_SECS", value)?;
        }
        if let Some(value) = lookup("HTTP_MAX_RETRIES") {
            self.http.max_retries = parse_env("HTTP_MAX_RETRIES", value)?;
        }
        Ok(())
    }
}
