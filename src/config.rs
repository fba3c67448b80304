//! Process configuration
//!
//! Read once from the environment at startup and handed to the components
//! that need it. Nothing else reads environment variables.

use std::time::Duration;
use thiserror::Error;

const DEFAULT_API_URL: &str = "https://api.ultravox.ai/api";
const DEFAULT_VOICE: &str = "Mark";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PORT: u16 = 5001;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Everything the server needs to know about its surroundings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Ultravox API key, sent as `X-API-Key`
    pub api_key: String,
    /// Ultravox REST base, e.g. `https://api.ultravox.ai/api`
    pub api_url: String,
    /// Public base URL the provider calls tools back on (an ngrok URL in development)
    pub tool_base_url: String,
    pub voice: String,
    pub provider_timeout: Duration,
    /// Extra attempts for transient provider failures; 0 disables retrying
    pub max_retries: u32,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = get("ULTRAVOX_API_KEY").ok_or(ConfigError::Missing("ULTRAVOX_API_KEY"))?;
        let tool_base_url = get("TOOL_BASE_URL").ok_or(ConfigError::Missing("TOOL_BASE_URL"))?;
        if !tool_base_url.starts_with("http://") && !tool_base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: "TOOL_BASE_URL",
                value: tool_base_url,
            });
        }

        let api_url = get("ULTRAVOX_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let voice = get("ULTRAVOX_VOICE").unwrap_or_else(|| DEFAULT_VOICE.to_string());

        let timeout_secs = parse_or("ULTRAVOX_TIMEOUT_SECS", get("ULTRAVOX_TIMEOUT_SECS"), DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "ULTRAVOX_TIMEOUT_SECS",
                value: timeout_secs.to_string(),
            });
        }
        let max_retries = parse_or("ULTRAVOX_MAX_RETRIES", get("ULTRAVOX_MAX_RETRIES"), 0)?;
        let port = parse_or("PORT", get("PORT"), DEFAULT_PORT)?;

        Ok(Self {
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            tool_base_url,
            voice,
            provider_timeout: Duration::from_secs(timeout_secs),
            max_retries,
            port,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: v }),
    }
}
