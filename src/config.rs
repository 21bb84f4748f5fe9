//! Configuration management for riftwatch.

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::api::{Region, DEFAULT_HOST};
use crate::error::{Result, RiftwatchError};
use crate::ratelimit::RateLimitRule;

/// Prefix of environment variables overriding file settings.
const ENV_PREFIX: &str = "RIFTWATCH";

/// Main configuration for riftwatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiftwatchConfig {
    /// API client configuration
    #[serde(default)]
    pub client: ClientConfig,

    /// Rate limit tiers, all of which must be respected
    #[serde(default = "default_rate_limits")]
    pub rate_limits: Vec<RateLimitRule>,
}

impl Default for RiftwatchConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            rate_limits: default_rate_limits(),
        }
    }
}

/// API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Region to query
    #[serde(default)]
    pub region: Region,

    /// API key sent with every request
    #[serde(default)]
    pub api_key: String,

    /// API host, without region prefix
    #[serde(default = "default_host")]
    pub host: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            region: Region::default(),
            api_key: String::new(),
            host: default_host(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Get the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_rate_limits() -> Vec<RateLimitRule> {
    RateLimitRule::development_key()
}

impl RiftwatchConfig {
    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: RiftwatchConfig = serde_yaml::from_str(yaml)
            .map_err(|e| RiftwatchError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file, with `RIFTWATCH__*` environment
    /// variables taking precedence (e.g. `RIFTWATCH__CLIENT__API_KEY`).
    pub fn from_file(path: &str) -> Result<Self> {
        if !std::path::Path::new(path).exists() {
            return Err(RiftwatchError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("configuration file not found: {}", path),
            )));
        }
        Self::load(Some(path))
    }

    /// Load configuration from `RIFTWATCH__*` environment variables alone,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::new(path, FileFormat::Yaml));
        }

        let config: RiftwatchConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .and_then(|c| c.try_deserialize::<RiftwatchConfig>())
            .map_err(|e| RiftwatchError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the client cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.rate_limits.is_empty() {
            return Err(RiftwatchError::Config(
                "at least one rate limit tier is required".to_string(),
            ));
        }
        for rule in &self.rate_limits {
            rule.validate()?;
        }
        if self.client.host.trim().is_empty() {
            return Err(RiftwatchError::Config("host must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Mutex, MutexGuard};

    /// Serializes tests that read or write `RIFTWATCH__*` variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn lock_env() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn test_default_config() {
        let config = RiftwatchConfig::default();
        assert_eq!(config.client.region, Region::Na);
        assert_eq!(config.client.host, "api.pvp.net");
        assert_eq!(config.client.timeout(), Duration::from_secs(10));
        assert_eq!(config.rate_limits.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
client:
  region: euw
  api_key: abc-123
  timeout_secs: 3
rate_limits:
  - limit: 20
    window_secs: 1
  - limit: 100
    window_secs: 120
"#;
        let config = RiftwatchConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.client.region, Region::Euw);
        assert_eq!(config.client.api_key, "abc-123");
        assert_eq!(config.client.host, "api.pvp.net");
        assert_eq!(config.client.timeout_secs, 3);
        assert_eq!(
            config.rate_limits,
            vec![RateLimitRule::new(20, 1.0), RateLimitRule::new(100, 120.0)]
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = RiftwatchConfig::from_yaml("client:\n  api_key: k\n").unwrap();
        assert_eq!(config.client.region, Region::Na);
        assert_eq!(config.rate_limits, RateLimitRule::development_key());
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(RiftwatchConfig::from_yaml("rate_limits: []\n").is_err());
        let zero_limit = "rate_limits:\n  - limit: 0\n    window_secs: 1\n";
        assert!(RiftwatchConfig::from_yaml(zero_limit).is_err());
        assert!(RiftwatchConfig::from_yaml("client:\n  region: mars\n").is_err());
    }

    #[test]
    fn test_oversized_window_rejected() {
        let yaml = "rate_limits:\n  - limit: 1\n    window_secs: 1e20\n";
        let err = RiftwatchConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, RiftwatchError::Config(_)));
    }

    #[test]
    fn test_from_file() {
        let _env = lock_env();
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "client:\n  region: kr\n  api_key: from-file").unwrap();

        let config = RiftwatchConfig::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.client.region, Region::Kr);
        assert_eq!(config.rate_limits, RateLimitRule::development_key());
    }

    #[test]
    fn test_env_overrides_file() {
        let _env = lock_env();
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "client:\n  region: euw\n  api_key: from-file\n  timeout_secs: 30").unwrap();

        std::env::set_var("RIFTWATCH__CLIENT__API_KEY", "from-env");
        std::env::set_var("RIFTWATCH__CLIENT__TIMEOUT_SECS", "3");
        let config = RiftwatchConfig::from_file(file.path().to_str().unwrap());
        std::env::remove_var("RIFTWATCH__CLIENT__API_KEY");
        std::env::remove_var("RIFTWATCH__CLIENT__TIMEOUT_SECS");

        let config = config.unwrap();
        assert_eq!(config.client.api_key, "from-env");
        assert_eq!(config.client.timeout_secs, 3);
        // Settings without an override still come from the file
        assert_eq!(config.client.region, Region::Euw);
    }

    #[test]
    fn test_from_env_without_file() {
        let _env = lock_env();

        std::env::set_var("RIFTWATCH__CLIENT__API_KEY", "env-only");
        let config = RiftwatchConfig::from_env();
        std::env::remove_var("RIFTWATCH__CLIENT__API_KEY");

        let config = config.unwrap();
        assert_eq!(config.client.api_key, "env-only");
        assert_eq!(config.client.region, Region::Na);
        assert_eq!(config.client.host, "api.pvp.net");
        assert_eq!(config.rate_limits, RateLimitRule::development_key());
    }

    #[test]
    fn test_from_missing_file() {
        let err = RiftwatchConfig::from_file("/nonexistent/riftwatch.yaml").unwrap_err();
        assert!(matches!(err, RiftwatchError::Io(_)));
    }
}
