use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Management topology of the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// A single self-contained server process
    Standalone,
    /// A host controller supervising managed servers
    Domain,
}

/// Timing of lifecycle calls.
///
/// Every coordinator carries its own copy, so tests can shrink the values.
///
/// # Examples
///
/// ```
/// use mgmt_admin::config::LifecycleConfig;
/// use std::time::Duration;
///
/// let config = LifecycleConfig::default();
/// assert_eq!(config.timeout(), Duration::from_secs(60));
/// assert_eq!(config.settle_delay(), Duration::from_millis(500));
/// assert_eq!(config.poll_interval(), Duration::from_millis(200));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LifecycleConfig {
    /// Upper bound for a process to come back, and for the reconnect attempt.
    pub timeout_secs: u64,

    /// Pause after triggering an operation, before the first check.
    /// The trigger may return before the remote process starts its transition.
    pub settle_delay_ms: u64,

    /// Pause between two unsuccessful checks.
    pub poll_interval_ms: u64,
}

impl LifecycleConfig {
    /// Lifecycle timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Settle delay
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Poll interval
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            settle_delay_ms: 500,
            poll_interval_ms: 200,
        }
    }
}

/// Main configuration for the administration client.
///
/// # JSON Schema
///
/// ```json
/// {
///   "topology": "domain",
///   "defaultHost": "master",
///   "lifecycle": {
///     "timeoutSecs": 120,
///     "settleDelayMs": 500,
///     "pollIntervalMs": 200
///   }
/// }
/// ```
///
/// Every field is optional. Without `topology` the remote side is asked for its
/// launch type when connecting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Topology of the remote side; detected when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topology: Option<Topology>,

    /// Host controller that domain-wide lifecycle calls act upon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_host: Option<String>,

    /// Lifecycle timing.
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
}

impl Config {
    /// Loads a configuration from a file path.
    ///
    /// Files ending in `.yaml` or `.yml` are parsed as YAML, anything else as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The file cannot be read
    /// * The file contents are not valid JSON or YAML
    /// * The document does not conform to the expected schema
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigParse(format!("Failed to read config file: {}", e)))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::parse_from_yaml_str(&content),
            _ => Self::parse_from_str(&content),
        }
    }

    /// Parses a configuration from a JSON string.
    pub fn parse_from_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::ConfigParse(format!("Failed to parse JSON config: {}", e)))
    }

    /// Parses a configuration from a YAML string.
    pub fn parse_from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigParse(format!("Failed to parse YAML config: {}", e)))
    }
}
