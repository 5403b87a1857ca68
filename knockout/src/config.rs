//! Roster and layout configuration.
//!
//! Consolidates environment variable reads and provides validated configuration.

use crate::roster::DEFAULT_MAX_NAME_LEN;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Default delay before connectors are recomputed after a change.
pub const DEFAULT_RELAYOUT_DELAY_MS: u64 = 10;

/// Default location of the persisted roster.
pub const DEFAULT_STORE_PATH: &str = "knockout-roster.json";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Roster configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Maximum characters per name before the length guard cuts it (default: 30)
    pub max_name_len: usize,

    /// Delay before connector lines are recomputed, in milliseconds (default: 10)
    pub relayout_delay_ms: u64,

    /// File holding the persisted roster text and team-mode flag
    pub store_path: PathBuf,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            max_name_len: DEFAULT_MAX_NAME_LEN,
            relayout_delay_ms: DEFAULT_RELAYOUT_DELAY_MS,
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
        }
    }
}

impl RosterConfig {
    /// Load configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `KNOCKOUT_MAX_NAME_LEN`: Maximum characters per name (default: 30)
    /// - `KNOCKOUT_RELAYOUT_DELAY_MS`: Connector recompute delay (default: 10)
    /// - `KNOCKOUT_STORE`: Roster file path (default: knockout-roster.json)
    ///
    /// # Errors
    ///
    /// Returns error if the loaded values fail validation
    pub fn from_env() -> ConfigResult<Self> {
        let defaults = Self::default();
        let config = Self {
            max_name_len: parse_env_or("KNOCKOUT_MAX_NAME_LEN", defaults.max_name_len),
            relayout_delay_ms: parse_env_or("KNOCKOUT_RELAYOUT_DELAY_MS", defaults.relayout_delay_ms),
            store_path: std::env::var("KNOCKOUT_STORE")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_path),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_name_len == 0 {
            return Err(ConfigError::Invalid {
                var: "KNOCKOUT_MAX_NAME_LEN".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.relayout_delay_ms > 1000 {
            return Err(ConfigError::Invalid {
                var: "KNOCKOUT_RELAYOUT_DELAY_MS".to_string(),
                reason: "Must be at most 1000".to_string(),
            });
        }

        if self.store_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                var: "KNOCKOUT_STORE".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        // SAFETY: tests touching the environment are serialized
        unsafe {
            std::env::remove_var("KNOCKOUT_MAX_NAME_LEN");
            std::env::remove_var("KNOCKOUT_RELAYOUT_DELAY_MS");
            std::env::remove_var("KNOCKOUT_STORE");
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = RosterConfig::default();
        assert_eq!(config.max_name_len, 30);
        assert_eq!(config.relayout_delay_ms, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = RosterConfig::from_env().unwrap();
        assert_eq!(config, RosterConfig::default());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        unsafe {
            std::env::set_var("KNOCKOUT_MAX_NAME_LEN", "12");
            std::env::set_var("KNOCKOUT_STORE", "/tmp/bracket.json");
        }
        let config = RosterConfig::from_env().unwrap();
        assert_eq!(config.max_name_len, 12);
        assert_eq!(config.store_path, PathBuf::from("/tmp/bracket.json"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_unparsable_falls_back() {
        clear_env();
        unsafe {
            std::env::set_var("KNOCKOUT_MAX_NAME_LEN", "lots");
        }
        let config = RosterConfig::from_env().unwrap();
        assert_eq!(config.max_name_len, DEFAULT_MAX_NAME_LEN);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_zero_length() {
        clear_env();
        unsafe {
            std::env::set_var("KNOCKOUT_MAX_NAME_LEN", "0");
        }
        let err = RosterConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("KNOCKOUT_MAX_NAME_LEN"));
        clear_env();
    }

    #[test]
    fn test_validate_rejects_slow_relayout() {
        let config = RosterConfig {
            relayout_delay_ms: 5000,
            ..RosterConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }
}
