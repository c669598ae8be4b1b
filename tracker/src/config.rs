//! Tracker configuration with TOML file support.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::logging::LogFormat;
use crate::TrackerError;

/// Configuration for a [`crate::ShareTracker`].
///
/// Can be loaded from a TOML file via [`TrackerConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Number of recent shares kept in the lookbehind window.
    #[serde(default = "default_lookbehind")]
    pub lookbehind: usize,

    /// Age-based removal of old tree roots during maintenance.
    #[serde(default)]
    pub pruning: PruningConfig,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Seconds between maintenance passes of the tracker service.
    #[serde(default = "default_maintenance_interval_secs")]
    pub maintenance_interval_secs: u64,

    /// Capacity of the tracker service's inbound share queue.
    #[serde(default = "default_inbound_capacity")]
    pub inbound_capacity: usize,
}

/// Configuration for share pruning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruningConfig {
    /// Whether maintenance removes old shares at all.
    #[serde(default)]
    pub enabled: bool,
    /// Shares whose timestamp is older than this many seconds are eligible.
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,
    /// Maximum number of shares removed per maintenance pass.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_lookbehind() -> usize {
    200
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_maintenance_interval_secs() -> u64 {
    5
}

fn default_inbound_capacity() -> usize {
    1024
}

fn default_max_age_secs() -> u64 {
    24 * 3600 // 1 day
}

fn default_batch_size() -> usize {
    1000
}

// ── Impl ───────────────────────────────────────────────────────────────

impl TrackerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, TrackerError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| TrackerError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, TrackerError> {
        toml::from_str(s).map_err(|e| TrackerError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, TrackerError> {
        toml::to_string_pretty(self).map_err(|e| TrackerError::Config(e.to_string()))
    }

    pub fn maintenance_interval(&self) -> Duration {
        Duration::from_secs(self.maintenance_interval_secs.max(1))
    }

    /// Install the global tracing subscriber described by this config.
    pub fn init_logging(&self) -> Result<(), TrackerError> {
        crate::logging::init_logging(self.log_format, &self.log_level)
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            lookbehind: default_lookbehind(),
            pruning: PruningConfig::default(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            maintenance_interval_secs: default_maintenance_interval_secs(),
            inbound_capacity: default_inbound_capacity(),
        }
    }
}

impl Default for PruningConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_age_secs: default_max_age_secs(),
            batch_size: default_batch_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = TrackerConfig {
            lookbehind: 50,
            ..Default::default()
        };
        let toml_str = config.to_toml_string().expect("serializable");
        let parsed = TrackerConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = TrackerConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.lookbehind, 200);
        assert!(!config.pruning.enabled);
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.maintenance_interval(), Duration::from_secs(5));
        assert_eq!(config.inbound_capacity, 1024);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let config = TrackerConfig {
            maintenance_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.maintenance_interval(), Duration::from_secs(1));
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            lookbehind = 24
            log_format = "json"

            [pruning]
            enabled = true
            max_age_secs = 600
        "#;
        let config = TrackerConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.lookbehind, 24);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.pruning.enabled);
        assert_eq!(config.pruning.max_age_secs, 600);
        assert_eq!(config.pruning.batch_size, 1000); // default
        assert_eq!(config.log_level, "info"); // default
    }

    #[test]
    fn unknown_log_format_is_config_error() {
        let result = TrackerConfig::from_toml_str(r#"log_format = "xml""#);
        assert!(matches!(result, Err(TrackerError::Config(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "lookbehind = 7").expect("write");
        let config =
            TrackerConfig::from_toml_file(file.path().to_str().expect("utf-8 path")).expect("load");
        assert_eq!(config.lookbehind, 7);
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = TrackerConfig::from_toml_file("/nonexistent/sharechain.toml");
        assert!(matches!(result, Err(TrackerError::Config(_))));
    }
}
