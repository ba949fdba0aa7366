use crate::config::{Config, LifecycleConfig};
use crate::error::{Error, Result};

/// Validates lifecycle timing
pub fn validate_lifecycle_config(config: &LifecycleConfig) -> Result<()> {
    if config.timeout_secs == 0 {
        return Err(Error::ConfigInvalid(
            "Lifecycle timeout must be greater than zero".to_string(),
        ));
    }

    if config.poll_interval_ms == 0 {
        return Err(Error::ConfigInvalid(
            "Poll interval must be greater than zero".to_string(),
        ));
    }

    if config.poll_interval() >= config.timeout() {
        return Err(Error::ConfigInvalid(format!(
            "Poll interval ({} ms) must be shorter than the lifecycle timeout ({} s)",
            config.poll_interval_ms, config.timeout_secs
        )));
    }

    Ok(())
}

/// Full configuration validation
pub fn validate_config(config: &Config) -> Result<()> {
    validate_lifecycle_config(&config.lifecycle)?;

    if let Some(host) = &config.default_host {
        if host.trim().is_empty() {
            return Err(Error::ConfigInvalid("Default host is empty".to_string()));
        }
    }

    Ok(())
}
