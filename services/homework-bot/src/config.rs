//! Configuration types for the homework bot

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub practicum: PracticumConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Homework review API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticumConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Usually supplied through `PRACTICUM_TOKEN` rather than the file
    #[serde(default, skip_serializing)]
    pub token: String,
}

impl Default for PracticumConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            token: String::new(),
        }
    }
}

/// Telegram Bot API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
    #[serde(default, skip_serializing)]
    pub token: String,
    #[serde(default)]
    pub chat_id: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_url: default_telegram_api_url(),
            token: String::new(),
            chat_id: String::new(),
        }
    }
}

/// Poll loop timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_retry_period")]
    pub retry_period_seconds: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            retry_period_seconds: default_retry_period(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

/// Log sinks. Stdout is always on; the file sink appends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_file")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}

fn default_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_retry_period() -> u64 {
    600
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from("main.log"))
}

impl Config {
    /// Fill credentials from the process environment.
    ///
    /// Environment values win over whatever the config file carried; unset or
    /// empty variables leave the file value in place.
    pub fn resolve_secrets(&mut self) {
        self.resolve_secrets_from(|name| std::env::var(name).ok());
    }

    /// Same as [`Config::resolve_secrets`] with an injectable lookup
    pub fn resolve_secrets_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let targets = [
            (PRACTICUM_TOKEN_VAR, &mut self.practicum.token),
            (TELEGRAM_TOKEN_VAR, &mut self.telegram.token),
            (TELEGRAM_CHAT_ID_VAR, &mut self.telegram.chat_id),
        ];
        for (name, slot) in targets {
            match lookup(name) {
                Some(value) if !value.trim().is_empty() => {
                    tracing::debug!("Resolved {} from environment", name);
                    *slot = value;
                }
                _ => {}
            }
        }
    }

    /// Names of required credentials that are still empty
    pub fn missing_tokens(&self) -> Vec<&'static str> {
        [
            (PRACTICUM_TOKEN_VAR, &self.practicum.token),
            (TELEGRAM_TOKEN_VAR, &self.telegram.token),
            (TELEGRAM_CHAT_ID_VAR, &self.telegram.chat_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Startup gate: every credential must be present before the loop runs
    pub fn check_tokens(&self) -> crate::Result<()> {
        let missing = self.missing_tokens();
        if missing.is_empty() {
            return Ok(());
        }
        Err(crate::HomeworkBotError::Config(format!(
            "missing required environment variables: {}",
            missing.join(", ")
        )))
    }
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::HomeworkBotError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
