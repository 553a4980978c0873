//! Configuration file loader
//! Loads optional YAML settings for verification sessions

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::chain::MalformedLinePolicy;
use crate::error::LogChainError;

/// Settings file; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub duration_minutes: Option<i64>,
    pub pass_interval_ms: Option<u64>,
    pub malformed_policy: Option<MalformedLinePolicy>,
    pub debug: Option<bool>,
}

/// Load a YAML settings file
pub fn load_config_file(path: &Path) -> Result<ConfigFile, LogChainError> {
    info!("Loading configuration from: {:?}", path);

    if !path.exists() {
        return Err(LogChainError::ConfigError(format!(
            "Configuration file not found: {:?}",
            path
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        LogChainError::ConfigError(format!("Failed to read {:?}: {}", path, e))
    })?;

    if contents.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

    serde_yaml::from_str(&contents).map_err(|e| {
        LogChainError::ConfigError(format!("Failed to parse {:?}: {}", path, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_config_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("logreader.yml");
        fs::write(
            &path,
            "duration_minutes: 10\npass_interval_ms: 500\nmalformed_policy: break-chain\n",
        )
        .unwrap();

        let file = load_config_file(&path).unwrap();
        assert_eq!(file.duration_minutes, Some(10));
        assert_eq!(file.pass_interval_ms, Some(500));
        assert_eq!(file.malformed_policy, Some(MalformedLinePolicy::BreakChain));
        assert_eq!(file.debug, None);
    }

    #[test]
    fn test_missing_config_file() {
        let temp_dir = tempdir().unwrap();
        let err = load_config_file(&temp_dir.path().join("nope.yml")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("logreader.yml");
        fs::write(&path, "durration: 3\n").unwrap();

        assert!(load_config_file(&path).unwrap_err().is_config_error());
    }

    #[test]
    fn test_empty_config_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("logreader.yml");
        fs::write(&path, "").unwrap();

        assert_eq!(load_config_file(&path).unwrap(), ConfigFile::default());
    }
}
