use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for Linguo
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Event bus configuration
    #[serde(default)]
    pub event_bus: EventBusSettings,

    /// Fetch reconciliation configuration
    #[serde(default)]
    pub reconciler: ReconcilerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Supported language groups and the group pairs tasks may translate between
    #[serde(default)]
    pub languages: LanguagesConfig,
}

/// Event bus configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EventBusSettings {
    /// Capacity of the broadcast channel shared by every listener
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

const fn default_channel_capacity() -> usize {
    1024
}

impl Default for EventBusSettings {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Fetch reconciliation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReconcilerConfig {
    /// Give up on a user-initiated fetch after this many milliseconds.
    /// Unset means wait indefinitely.
    #[serde(default)]
    pub fetch_timeout_ms: Option<u64>,

    /// Interval for background refreshes using the internal key.
    /// Unset disables them.
    #[serde(default)]
    pub background_refresh_secs: Option<u64>,

    /// Accounts refreshed in the background
    #[serde(default)]
    pub background_accounts: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling JSON log files; unset logs to stderr only
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}

/// One group of mutually intelligible language codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageGroupConfig {
    pub name: String,
    #[serde(default)]
    pub languages: Vec<String>,
}

/// Language groups and the pairs of groups translation is offered between
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LanguagesConfig {
    /// Groups in display order
    #[serde(default)]
    pub groups: Vec<LanguageGroupConfig>,

    /// Unordered pairs of group names, e.g. `[en, es]`
    #[serde(default)]
    pub pairs: Vec<(String, String)>,
}
