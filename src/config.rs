use crate::auth::AuthConfig;
use crate::ingestion::OracleConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a textfold server instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path where the server will store its data
    pub storage_path: PathBuf,
    /// Maximum number of records returned by the history listing
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Classification oracle configuration
    #[serde(default)]
    pub oracle: OracleConfig,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
}

fn default_history_limit() -> usize {
    100
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("data"),
            history_limit: default_history_limit(),
            oracle: OracleConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create a new configuration with the specified storage path
    pub fn new(storage_path: PathBuf) -> Self {
        Self {
            storage_path,
            ..Default::default()
        }
    }

    /// Validate the configuration (including oracle and auth settings)
    pub fn validate(&self) -> Result<(), crate::error::TextfoldError> {
        self.oracle
            .validate()
            .map_err(|e| crate::error::TextfoldError::Config(e.to_string()))?;
        if self.history_limit == 0 {
            return Err(crate::error::TextfoldError::Config(
                "history_limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply environment variable overrides for secrets and oracle settings.
    pub fn apply_env_vars(&mut self) {
        self.oracle.apply_env_vars();
        self.auth.apply_env_vars();
    }
}

/// Load an application configuration from the given path or from the
/// `TEXTFOLD_CONFIG` environment variable.
///
/// If the file does not exist, a default [`AppConfig`] is returned.
/// Environment variable overrides are applied in either case, so secrets
/// never have to live in the config file.
pub fn load_app_config(path: Option<&str>) -> Result<AppConfig, std::io::Error> {
    use std::fs;

    let config_path = path
        .map(|p| p.to_string())
        .or_else(|| std::env::var("TEXTFOLD_CONFIG").ok())
        .unwrap_or_else(|| "config/textfold.json".to_string());

    let mut config = if let Ok(config_str) = fs::read_to_string(&config_path) {
        match serde_json::from_str::<AppConfig>(&config_str) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::error!("Failed to parse configuration: {}", e);
                return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e));
            }
        }
    } else {
        AppConfig::default()
    };

    config.apply_env_vars();
    Ok(config)
}
