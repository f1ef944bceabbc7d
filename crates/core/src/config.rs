//! Client configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DivergenceError, Result};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend origin, without trailing slash
    pub api_base_url: String,

    pub polling: PollingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            polling: PollingConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Parse a JSON override. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: ClientConfig = serde_json::from_str(json)
            .map_err(|e| DivergenceError::Config(e.to_string()))?;
        config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.api_base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.is_empty() {
            return Err(DivergenceError::Config("api_base_url is empty".to_string()));
        }
        if self.polling.max_attempts == 0 {
            return Err(DivergenceError::Config("polling.max_attempts must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Timing of the post-login readiness poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_ms: u64,
    pub max_attempts: u32,
    /// Attempt index at which the second progress message appears
    pub analyzing_after: u32,
    /// Attempt index at which the third progress message appears
    pub building_after: u32,
    /// Pause before the fallback load after a network error
    pub error_delay_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            max_attempts: 30,
            analyzing_after: 5,
            building_after: 15,
            error_delay_ms: 1500,
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn error_delay(&self) -> Duration {
        Duration::from_millis(self.error_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_backend_contract() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.polling.interval(), Duration::from_secs(1));
        assert_eq!(config.polling.max_attempts, 30);
        assert_eq!(config.polling.error_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ClientConfig::from_json(r#"{"api_base_url": "https://api.example.com/"}"#).unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.polling, PollingConfig::default());
    }

    #[test]
    fn rejects_zero_attempts() {
        let err = ClientConfig::from_json(r#"{"polling": {"max_attempts": 0}}"#).unwrap_err();
        assert!(matches!(err, DivergenceError::Config(_)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(ClientConfig::from_json("not json").is_err());
    }
}
