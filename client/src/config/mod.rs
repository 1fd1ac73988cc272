//! Configuration management for the IronTrack client
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: IRONTRACK__)

use anyhow::Result;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// AI report service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Full URL of the messages endpoint
    pub endpoint: String,
    /// Never written back out; supply via IRONTRACK__AI__API_KEY
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub api_version: String,
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.anthropic.com/v1/messages".to_string(),
            api_key: None,
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 2000,
            timeout_secs: 30,
            api_version: "2023-06-01".to_string(),
        }
    }
}

/// Account directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Seed the directory with the two demo accounts
    pub seed_demo_accounts: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            seed_demo_accounts: true,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ai: AiConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with IRONTRACK__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name(&config_file).required(false))
            // e.g. IRONTRACK__AI__TIMEOUT_SECS=10 sets ai.timeout_secs
            .add_source(config::Environment::with_prefix("IRONTRACK").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.ai.timeout(), Duration::from_secs(30));
        assert_eq!(config.ai.max_tokens, 2000);
        assert_eq!(config.ai.api_version, "2023-06-01");
        assert!(config.ai.api_key.is_none());
        assert!(config.auth.seed_demo_accounts);
    }

    #[test]
    fn test_api_key_is_not_serialized() {
        let mut config = AppConfig::default();
        config.ai.api_key = Some(SecretString::new("sk-test".to_string()));
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-test"));
        assert!(!json.contains("api_key"));
    }

    #[test]
    fn test_defaults_survive_layering() {
        let built = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default()).unwrap())
            .build()
            .unwrap();
        let config: AppConfig = built.try_deserialize().unwrap();
        assert_eq!(config.ai.model, "claude-sonnet-4-20250514");
        assert!(config.ai.api_key.is_none());
    }

    #[test]
    fn test_is_production() {
        // Default should be false (development)
        assert!(!AppConfig::is_production());
    }
}
