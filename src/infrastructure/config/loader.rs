use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid channel_capacity: {0}. Must be at least 1")]
    InvalidChannelCapacity(usize),

    #[error("Invalid fetch_timeout_ms: {0}. Must be positive when set")]
    InvalidFetchTimeout(u64),

    #[error("Invalid background_refresh_secs: {0}. Must be positive when set")]
    InvalidRefreshInterval(u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid language pair: {0} does not name a configured language group")]
    InvalidLanguagePair(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Figment with every configuration source merged.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .linguo/config.yaml (project config)
    /// 3. .linguo/local.yaml (project local overrides, optional)
    /// 4. Environment variables (LINGUO_* prefix, `__` separates nested keys)
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".linguo/config.yaml"))
            .merge(Yaml::file(".linguo/local.yaml"))
            .merge(Env::prefixed("LINGUO_").split("__"))
    }

    /// Load configuration with hierarchical merging
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.event_bus.channel_capacity == 0 {
            return Err(ConfigError::InvalidChannelCapacity(
                config.event_bus.channel_capacity,
            ));
        }

        if let Some(timeout) = config.reconciler.fetch_timeout_ms {
            if timeout == 0 {
                return Err(ConfigError::InvalidFetchTimeout(timeout));
            }
        }

        if let Some(interval) = config.reconciler.background_refresh_secs {
            if interval == 0 {
                return Err(ConfigError::InvalidRefreshInterval(interval));
            }
            if config.reconciler.background_accounts.is_empty() {
                return Err(ConfigError::ValidationFailed(
                    "background_refresh_secs is set but background_accounts is empty".to_string(),
                ));
            }
        }

        if config
            .reconciler
            .background_accounts
            .iter()
            .any(|account| account.trim().is_empty())
        {
            return Err(ConfigError::ValidationFailed(
                "background_accounts cannot contain empty accounts".to_string(),
            ));
        }

        let groups: Vec<&str> = config
            .languages
            .groups
            .iter()
            .map(|group| group.name.as_str())
            .collect();
        for (a, b) in &config.languages.pairs {
            for name in [a, b] {
                if !groups.contains(&name.as_str()) {
                    return Err(ConfigError::InvalidLanguagePair(name.clone()));
                }
            }
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.event_bus.channel_capacity, 1024);
        assert!(config.reconciler.fetch_timeout_ms.is_none());
        assert!(config.reconciler.background_refresh_secs.is_none());
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
event_bus:
  channel_capacity: 64
reconciler:
  fetch_timeout_ms: 5000
  background_refresh_secs: 30
  background_accounts:
    - '0xabc'
logging:
  level: debug
  format: pretty
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.event_bus.channel_capacity, 64);
        assert_eq!(config.reconciler.fetch_timeout_ms, Some(5000));
        assert_eq!(config.reconciler.background_refresh_secs, Some(30));
        assert_eq!(config.reconciler.background_accounts, vec!["0xabc".to_string()]);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_zero_capacity() {
        let mut config = Config::default();
        config.event_bus.channel_capacity = 0;

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidChannelCapacity(0)
        ));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.reconciler.fetch_timeout_ms = Some(0);

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidFetchTimeout(0)
        ));
    }

    #[test]
    fn test_validate_refresh_without_accounts() {
        let mut config = Config::default();
        config.reconciler.background_refresh_secs = Some(10);

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::ValidationFailed(_)
        ));

        config.reconciler.background_accounts = vec!["0xabc".to_string()];
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "invalid"),
            _ => panic!("Expected InvalidLogLevel error"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogFormat(format) => assert_eq!(format, "xml"),
            _ => panic!("Expected InvalidLogFormat error"),
        }
    }

    #[test]
    fn test_env_override() {
        temp_env::with_vars(
            [
                ("LINGUO_RECONCILER__FETCH_TIMEOUT_MS", Some("750")),
                ("LINGUO_LOGGING__LEVEL", Some("debug")),
            ],
            || {
                let config: Config = ConfigLoader::figment().extract().unwrap();
                assert_eq!(config.reconciler.fetch_timeout_ms, Some(750));
                assert_eq!(config.logging.level, "debug");
                assert_eq!(config.logging.format, "json");
            },
        );
    }

    #[test]
    fn test_hierarchical_merging() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut base_file = NamedTempFile::new().unwrap();
        writeln!(
            base_file,
            "event_bus:\n  channel_capacity: 32\nlogging:\n  level: info\n  format: json"
        )
        .unwrap();
        base_file.flush().unwrap();

        let mut override_file = NamedTempFile::new().unwrap();
        writeln!(override_file, "event_bus:\n  channel_capacity: 128\nlogging:\n  level: debug").unwrap();
        override_file.flush().unwrap();

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.event_bus.channel_capacity, 128, "Override should win");
        assert_eq!(
            config.logging.level, "debug",
            "Override should win for nested fields"
        );
        assert_eq!(
            config.logging.format, "json",
            "Base value should persist when not overridden"
        );
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;

        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "reconciler:\n  fetch_timeout_ms: 1200").unwrap();
        file.flush().unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.reconciler.fetch_timeout_ms, Some(1200));
    }

    #[test]
    fn test_validate_language_pairs_name_known_groups() {
        let yaml = r"
languages:
  groups:
    - name: en
      languages: [en-us]
    - name: es
      languages: [es]
  pairs:
    - [en, es]
";
        let mut config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(ConfigLoader::validate(&config).is_ok());

        config.languages.pairs.push(("en".to_string(), "klingon".to_string()));
        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLanguagePair(name) => assert_eq!(name, "klingon"),
            other => panic!("Expected InvalidLanguagePair, got {other}"),
        }
    }
}
