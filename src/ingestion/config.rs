//! Configuration for the classification oracle

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use super::{IngestionError, IngestionResult};

/// Configuration for the classification oracle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// API key for the oracle service
    pub api_key: String,
    /// Model identifier to request
    pub model: String,
    /// API base URL
    pub base_url: String,
    /// Maximum number of retries for retryable oracle failures
    pub max_retries: u32,
    /// Timeout for oracle calls in seconds
    pub timeout_seconds: u64,
    /// Fixed delay between oracle calls on the batch path, in milliseconds
    pub batch_delay_ms: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "google/gemini-2.5-flash".to_string(),
            base_url: "https://openrouter.ai/api/v1".to_string(),
            max_retries: 3,
            timeout_seconds: 30,
            batch_delay_ms: 2000,
        }
    }
}

impl OracleConfig {
    /// Whether the oracle can be called at all
    pub fn is_ready(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// The API key in a form safe to log
    pub fn api_key_masked(&self) -> String {
        if self.api_key.is_empty() {
            "<not configured>".to_string()
        } else {
            "***configured***".to_string()
        }
    }

    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Backoff delay before the given retry attempt, exponential with a cap.
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let base = Duration::from_secs(1);
        let max = Duration::from_secs(30);
        base.saturating_mul(2u32.saturating_pow(attempt)).min(max)
    }

    /// Apply environment variable overrides
    pub fn apply_env_vars(&mut self) {
        if let Ok(api_key) = env::var("ORACLE_API_KEY") {
            self.api_key = api_key;
        }
        if let Ok(model) = env::var("ORACLE_MODEL") {
            self.model = model;
        }
        if let Ok(base_url) = env::var("ORACLE_BASE_URL") {
            self.base_url = base_url;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> IngestionResult<()> {
        if self.model.is_empty() {
            return Err(IngestionError::configuration_error(
                "Model identifier is required",
            ));
        }
        if self.base_url.is_empty() {
            return Err(IngestionError::configuration_error("Base URL is required"));
        }
        if self.timeout_seconds == 0 {
            return Err(IngestionError::configuration_error(
                "Timeout must be greater than 0",
            ));
        }
        if self.timeout_seconds > 300 {
            return Err(IngestionError::configuration_error(
                "Timeout should not exceed 300 seconds",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_but_not_ready() {
        let config = OracleConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.is_ready());
        assert_eq!(config.api_key_masked(), "<not configured>");
    }

    #[test]
    fn config_with_key_is_ready() {
        let config = OracleConfig {
            api_key: "test-key".to_string(),
            ..Default::default()
        };
        assert!(config.is_ready());
        assert_eq!(config.api_key_masked(), "***configured***");
    }

    #[test]
    fn validation_rejects_bad_timeouts() {
        let config = OracleConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = OracleConfig {
            timeout_seconds: 301,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn retry_delay_grows_and_caps() {
        let config = OracleConfig::default();
        assert_eq!(config.retry_delay(0), Duration::from_secs(1));
        assert_eq!(config.retry_delay(1), Duration::from_secs(2));
        assert_eq!(config.retry_delay(2), Duration::from_secs(4));
        assert_eq!(config.retry_delay(10), Duration::from_secs(30));
    }
}
