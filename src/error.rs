use thiserror::Error;

impl From<serde_json::Error> for LogChainError {
    fn from(err: serde_json::Error) -> Self {
        Self::ReportError(format!("JSON serialization error: {}", err))
    }
}

#[derive(Error, Debug)]
pub enum LogChainError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid duration: {0} minutes (must not be negative)")]
    InvalidDuration(i64),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Report error: {0}")]
    ReportError(String),
}

impl LogChainError {
    pub fn no_sources() -> Self {
        Self::ConfigError("at least one log file must be given".to_string())
    }

    pub fn unknown_policy(name: &str) -> Self {
        Self::ConfigError(format!(
            "Unknown malformed-line policy: {}. Must be carry-forward or break-chain",
            name
        ))
    }

    /// Configuration problems map to the usage exit status rather than a
    /// verification failure.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError(_) | Self::InvalidDuration(_))
    }
}

pub type Result<T> = std::result::Result<T, LogChainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_duration_message() {
        let err = LogChainError::InvalidDuration(-3);
        assert_eq!(
            err.to_string(),
            "Invalid duration: -3 minutes (must not be negative)"
        );
        assert!(err.is_config_error());
    }

    #[test]
    fn test_io_error_is_not_config_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: LogChainError = io.into();
        assert!(!err.is_config_error());
        assert!(err.to_string().contains("missing"));
    }
}
