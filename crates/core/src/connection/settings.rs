use crate::config::{MongoConfig, Result};

/// Transport security protocol versions the data-plane client accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsProtocol {
    Tls12,
}

impl TlsProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tls12 => "TLSv1.2",
        }
    }
}

/// Description of the data-plane client built from a [`MongoConfig`].
///
/// Whether TLS is used, and with which certificates, is left entirely to the
/// driver's reading of the connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub connection_string: String,
    pub database_name: String,
    /// Oldest protocol a TLS connection may negotiate.
    ///
    /// Informational only. The driver's rustls stack offers TLS 1.2 and 1.3
    /// and has no option to narrow that, so 1.2 is a floor that always holds
    /// rather than a setting passed to the driver.
    pub minimum_tls_protocol: TlsProtocol,
}

impl ClientSettings {
    pub fn from_config(config: &MongoConfig) -> Result<Self> {
        config.connection_info()?;
        Ok(Self {
            connection_string: config.connection_string().to_string(),
            database_name: config.database_name().to_string(),
            minimum_tls_protocol: TlsProtocol::Tls12,
        })
    }
}
