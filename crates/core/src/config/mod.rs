mod error;
mod types;

pub use error::{ConfigError, Result};
pub use types::{DeploymentLocation, MongoConfig, DEFAULT_MANAGEMENT_PORT};
