use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};
use crate::connection::ConnectionInfo;
use crate::provisioning::{DEFAULT_INITIAL_THROUGHPUT, MIN_THROUGHPUT};

/// Default port of the managed-cloud administrative endpoint.
pub const DEFAULT_MANAGEMENT_PORT: u16 = 443;

/// Which kind of engine backs the database.
///
/// Determines the strategy used for database creation and throughput scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentLocation {
    /// Self-hosted MongoDB. Databases are created lazily on first write and
    /// there is no administrative throughput API.
    Local,
    /// Managed, throughput-provisioned service (Cosmos DB with the MongoDB API).
    ManagedCloud,
}

impl DeploymentLocation {
    /// Returns true if this location exposes billable, adjustable throughput.
    pub fn is_managed(&self) -> bool {
        matches!(self, Self::ManagedCloud)
    }
}

impl FromStr for DeploymentLocation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "managed-cloud" | "managedcloud" | "managed_cloud" | "azure" | "cosmos" => {
                Ok(Self::ManagedCloud)
            }
            other => Err(ConfigError::UnsupportedLocation(other.to_string())),
        }
    }
}

impl fmt::Display for DeploymentLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::ManagedCloud => write!(f, "managed-cloud"),
        }
    }
}

/// Immutable database configuration.
///
/// `initial_throughput` and `management_port` only matter for
/// [`DeploymentLocation::ManagedCloud`], but always hold valid values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoConfig {
    database_name: String,
    location: DeploymentLocation,
    connection_string: String,
    initial_throughput: u32,
    management_port: u16,
}

impl MongoConfig {
    /// Creates a validated configuration with default throughput and port.
    pub fn new(
        database_name: impl Into<String>,
        location: DeploymentLocation,
        connection_string: impl Into<String>,
    ) -> Result<Self> {
        let database_name = database_name.into();
        if database_name.trim().is_empty() {
            return Err(ConfigError::EmptyDatabaseName);
        }

        let connection_string = connection_string.into();
        if connection_string.trim().is_empty() {
            return Err(ConfigError::EmptyConnectionString);
        }
        ConnectionInfo::parse(&connection_string)?;

        Ok(Self {
            database_name,
            location,
            connection_string,
            initial_throughput: DEFAULT_INITIAL_THROUGHPUT,
            management_port: DEFAULT_MANAGEMENT_PORT,
        })
    }

    /// Returns a copy with a different initial throughput.
    pub fn with_initial_throughput(self, initial_throughput: u32) -> Result<Self> {
        if initial_throughput < MIN_THROUGHPUT {
            return Err(ConfigError::ThroughputTooLow {
                value: initial_throughput,
                minimum: MIN_THROUGHPUT,
            });
        }
        Ok(Self {
            initial_throughput,
            ..self
        })
    }

    /// Returns a copy with a different management port.
    pub fn with_management_port(self, management_port: u16) -> Result<Self> {
        if management_port == 0 {
            return Err(ConfigError::InvalidManagementPort(management_port));
        }
        Ok(Self {
            management_port,
            ..self
        })
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    pub fn location(&self) -> DeploymentLocation {
        self.location
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    pub fn initial_throughput(&self) -> u32 {
        self.initial_throughput
    }

    pub fn management_port(&self) -> u16 {
        self.management_port
    }

    /// Parsed form of the connection string.
    pub fn connection_info(&self) -> Result<ConnectionInfo> {
        ConnectionInfo::parse(&self.connection_string)
    }
}
