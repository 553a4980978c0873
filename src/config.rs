use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::chain::MalformedLinePolicy;
use crate::error::LogChainError;
use crate::session::{DEFAULT_DURATION_MINUTES, DEFAULT_PASS_INTERVAL};

pub mod loader;

pub use loader::{load_config_file, ConfigFile};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub duration_minutes: i64,
    pub pass_interval_ms: u64,
    pub malformed_policy: MalformedLinePolicy,
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            duration_minutes: DEFAULT_DURATION_MINUTES,
            pass_interval_ms: DEFAULT_PASS_INTERVAL.as_millis() as u64,
            malformed_policy: MalformedLinePolicy::default(),
            debug: false,
        }
    }
}

impl AppConfig {
    /// Load settings from the environment, falling back to defaults
    pub fn load() -> Result<Self, LogChainError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, LogChainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let duration_minutes = match lookup("LOGREADER_DURATION_MINUTES") {
            Some(value) => value.trim().parse().map_err(|e| {
                LogChainError::ConfigError(format!(
                    "LOGREADER_DURATION_MINUTES is not an integer: {}",
                    e
                ))
            })?,
            None => defaults.duration_minutes,
        };

        let pass_interval_ms = match lookup("LOGREADER_PASS_INTERVAL_MS") {
            Some(value) => value.trim().parse().map_err(|e| {
                LogChainError::ConfigError(format!(
                    "LOGREADER_PASS_INTERVAL_MS is not an integer: {}",
                    e
                ))
            })?,
            None => defaults.pass_interval_ms,
        };

        let malformed_policy = match lookup("LOGREADER_MALFORMED_POLICY") {
            Some(value) => value.parse()?,
            None => defaults.malformed_policy,
        };

        let debug = lookup("LOGREADER_DEBUG")
            .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
            .unwrap_or(defaults.debug);

        Ok(AppConfig {
            duration_minutes,
            pass_interval_ms,
            malformed_policy,
            debug,
        })
    }

    /// Values present in a config file replace the current ones
    pub fn merge_file(&mut self, file: ConfigFile) {
        if let Some(duration_minutes) = file.duration_minutes {
            self.duration_minutes = duration_minutes;
        }
        if let Some(pass_interval_ms) = file.pass_interval_ms {
            self.pass_interval_ms = pass_interval_ms;
        }
        if let Some(malformed_policy) = file.malformed_policy {
            self.malformed_policy = malformed_policy;
        }
        if let Some(debug) = file.debug {
            self.debug = debug;
        }
    }

    pub fn pass_interval(&self) -> Duration {
        Duration::from_millis(self.pass_interval_ms)
    }
}
