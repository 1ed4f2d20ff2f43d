//! Configuration Error Types
//!
//! Errors raised while loading registry configuration from files and the
//! environment, or while validating the loaded values.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors with detailed context
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Configuration file not found at the given path
    #[error("Configuration file not found: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    /// File or environment source could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// Invalid configuration value
    #[error("Invalid value '{value}' for field '{field}': {context}")]
    InvalidValue {
        field: String,
        value: String,
        context: String,
    },
}

impl ConfigurationError {
    pub fn config_file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigFileNotFound { path: path.into() }
    }

    pub fn invalid_value(
        field: impl Into<String>,
        value: impl ToString,
        context: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.to_string(),
            context: context.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigurationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_message() {
        let error = ConfigurationError::invalid_value("max_type_name_length", 0, "must be positive");
        assert_eq!(
            error.to_string(),
            "Invalid value '0' for field 'max_type_name_length': must be positive"
        );
    }

    #[test]
    fn test_file_not_found_message() {
        let error = ConfigurationError::config_file_not_found("/etc/registry.toml");
        assert!(error.to_string().contains("/etc/registry.toml"));
    }
}
