use thiserror::Error;

/// Errors that can occur when building a [`MongoConfig`](super::MongoConfig).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Database name must not be empty")]
    EmptyDatabaseName,
    #[error("Connection string must not be empty")]
    EmptyConnectionString,
    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),
    #[error("Initial throughput {value} is below the minimum of {minimum}")]
    ThroughputTooLow { value: u32, minimum: u32 },
    #[error("Management port must be between 1 and 65535, got {0}")]
    InvalidManagementPort(u16),
    #[error("Database location not supported ({0})")]
    UnsupportedLocation(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
