use thiserror::Error;

use crate::config::ConfigError;
use crate::storage::StorageError;

/// Errors that can occur while provisioning a database or scaling throughput.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProvisioningError {
    /// No provisioning strategy exists for the configured location. Fatal.
    #[error("Database location not supported ({0})")]
    UnsupportedLocation(String),
    #[error("{operation} failed for database '{database}': {message}")]
    Request {
        operation: &'static str,
        database: String,
        message: String,
    },
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("{0} was cancelled")]
    Cancelled(&'static str),
}

impl From<ConfigError> for ProvisioningError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::UnsupportedLocation(location) => Self::UnsupportedLocation(location),
            other => Self::Configuration(other.to_string()),
        }
    }
}

/// Result type for provisioning operations.
pub type Result<T> = std::result::Result<T, ProvisioningError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_display() {
        let error = ProvisioningError::Request {
            operation: "replace_offer",
            database: "Shop".to_string(),
            message: "403 Forbidden".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "replace_offer failed for database 'Shop': 403 Forbidden"
        );
    }

    #[test]
    fn test_unsupported_location_is_preserved() {
        let error: ProvisioningError = ConfigError::UnsupportedLocation("atlas".to_string()).into();
        assert_eq!(
            error,
            ProvisioningError::UnsupportedLocation("atlas".to_string())
        );
    }

    #[test]
    fn test_other_config_errors_become_configuration() {
        let error: ProvisioningError = ConfigError::EmptyDatabaseName.into();
        assert_eq!(
            error,
            ProvisioningError::Configuration("Database name must not be empty".to_string())
        );
    }

    #[test]
    fn test_storage_error_is_transparent() {
        let error: ProvisioningError =
            StorageError::ConnectionFailed("server selection timeout".to_string()).into();
        assert_eq!(error.to_string(), "Connection failed: server selection timeout");
    }
}
