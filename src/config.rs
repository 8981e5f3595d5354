use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::error::{ConfigError, Result};

/// Default config file looked up next to the binary.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Program configuration.
///
/// Values come from three layers, later ones winning: built-in defaults,
/// an optional `config.toml`, then environment variables.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path of the local question cache blob
    pub cache_file: String,
    /// Base URL of the cloud JSON document store
    pub cloud_base_url: String,
    /// Optional auth token appended to cloud requests (empty = none)
    pub cloud_auth_token: String,
    /// Seconds between cloud snapshot polls
    pub cloud_poll_secs: u64,
    /// Telegram bot credential
    pub tg_bot_token: String,
    /// Destination channel or chat id
    pub tg_chat_id: String,
    /// Milliseconds to wait between consecutive Telegram sends
    pub tg_send_delay_ms: u64,
    /// Code that unlocks the administrator role
    pub secret_code: String,
    /// Code entered for this session (compared against `secret_code`)
    pub session_code: String,
    /// Generative question-source configuration
    pub gemini_api_key: String,
    pub gemini_api_base: String,
    pub gemini_model: String,
    /// Whether to log per-record detail
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_file: "quiz_data.json".to_string(),
            cloud_base_url: "https://quiz-master-kh-default-rtdb.firebaseio.com".to_string(),
            cloud_auth_token: String::new(),
            cloud_poll_secs: 5,
            tg_bot_token: "8301052612:AAE4QDXA2GMi2nMBxfLe2_v-wQSpd-JrML0".to_string(),
            tg_chat_id: "@web_qcm_q_and_a".to_string(),
            tg_send_delay_ms: 300,
            secret_code: "168".to_string(),
            session_code: String::new(),
            gemini_api_key: String::new(),
            gemini_api_base: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            gemini_model: "gemini-3-pro-preview".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// Load configuration: `config.toml` when present, then environment
    /// overrides. A broken config file is reported and skipped rather than
    /// aborting the session.
    pub fn load() -> Self {
        let base = match Self::from_file(DEFAULT_CONFIG_FILE) {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("⚠️ {e}, falling back to defaults");
                Self::default()
            }
        };
        base.with_env_overrides()
    }

    /// Parse a TOML config file. `Ok(None)` when the file does not exist.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).map_err(|source| {
            crate::error::CacheError::ReadFailed {
                path: path.display().to_string(),
                source,
            }
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::InvalidFile {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Some(config))
    }

    /// Environment overrides, one variable per field.
    pub fn with_env_overrides(self) -> Self {
        Self {
            cache_file: std::env::var("QUIZ_CACHE_FILE").unwrap_or(self.cache_file),
            cloud_base_url: std::env::var("QUIZ_CLOUD_BASE_URL").unwrap_or(self.cloud_base_url),
            cloud_auth_token: std::env::var("QUIZ_CLOUD_AUTH_TOKEN")
                .unwrap_or(self.cloud_auth_token),
            cloud_poll_secs: std::env::var("QUIZ_CLOUD_POLL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.cloud_poll_secs),
            tg_bot_token: std::env::var("QUIZ_TG_BOT_TOKEN").unwrap_or(self.tg_bot_token),
            tg_chat_id: std::env::var("QUIZ_TG_CHAT_ID").unwrap_or(self.tg_chat_id),
            tg_send_delay_ms: std::env::var("QUIZ_TG_SEND_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.tg_send_delay_ms),
            secret_code: std::env::var("QUIZ_SECRET_CODE").unwrap_or(self.secret_code),
            session_code: std::env::var("QUIZ_SESSION_CODE").unwrap_or(self.session_code),
            gemini_api_key: std::env::var("GEMINI_API_KEY").unwrap_or(self.gemini_api_key),
            gemini_api_base: std::env::var("GEMINI_API_BASE").unwrap_or(self.gemini_api_base),
            gemini_model: std::env::var("GEMINI_MODEL").unwrap_or(self.gemini_model),
            verbose_logging: std::env::var("QUIZ_VERBOSE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.verbose_logging),
        }
    }
}
