use std::collections::HashMap;

use serde::Deserialize;

use crate::utils::constants::{
    DEFAULT_BASE_URL, DEFAULT_PERSISTENT_REFRESH_INTERVAL_MS, DEFAULT_REFRESH_WINDOW_MS,
};

/// ================================
/// Client-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ClientSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// token is treated as stale once it is older than this
    /// invariant: 0 < refresh_window_ms <= service token lifetime
    #[serde(default = "default_refresh_window_ms")]
    pub refresh_window_ms: u64,
    pub timeout_ms: Option<u64>,
    /// extra headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub persistent_refresh: PersistentRefreshConfig,
    /// Read by hosts only: the client never installs a subscriber. Pass it to
    /// `utils::logging::init_logging` at startup.
    pub logging: Option<LoggingConfig>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            refresh_window_ms: default_refresh_window_ms(),
            timeout_ms: None,
            headers: HashMap::new(),
            persistent_refresh: PersistentRefreshConfig::default(),
            logging: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PersistentRefreshConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_refresh_interval_ms")]
    pub interval_ms: u64,
}

impl Default for PersistentRefreshConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_ms: default_refresh_interval_ms(),
        }
    }
}

/// Partial settings applied on top of an existing client's settings.
/// Scalars replace, headers are merged key by key.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SettingsOverrides {
    pub base_url: Option<String>,
    pub refresh_window_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    pub persistent_refresh: Option<PersistentRefreshConfig>,
    pub logging: Option<LoggingConfig>,
}

impl ClientSettings {
    /// Parse a YAML document, expanding `${VAR:default}` from the environment, then validate.
    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        crate::config::proc_loader::parse_settings(content)
    }

    pub fn merged_with(&self, overrides: SettingsOverrides) -> Self {
        let mut merged = self.clone();
        if let Some(base_url) = overrides.base_url {
            merged.base_url = base_url;
        }
        if let Some(window) = overrides.refresh_window_ms {
            merged.refresh_window_ms = window;
        }
        if overrides.timeout_ms.is_some() {
            merged.timeout_ms = overrides.timeout_ms;
        }
        merged.headers.extend(overrides.headers);
        if let Some(persistent_refresh) = overrides.persistent_refresh {
            merged.persistent_refresh = persistent_refresh;
        }
        if overrides.logging.is_some() {
            merged.logging = overrides.logging;
        }
        merged
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Compact,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_refresh_window_ms() -> u64 {
    DEFAULT_REFRESH_WINDOW_MS
}

fn default_refresh_interval_ms() -> u64 {
    DEFAULT_PERSISTENT_REFRESH_INTERVAL_MS
}
