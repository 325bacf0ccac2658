//! Connection string details read from the driver's own parser.

use mongodb::options::{ConnectionString, HostInfo, ServerAddress};

use crate::config::{ConfigError, Result};

/// A connection string as the MongoDB driver understands it.
///
/// Parsing is purely syntactic: `mongodb+srv://` records are not resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionInfo {
    parsed: ConnectionString,
}

impl ConnectionInfo {
    pub fn parse(input: &str) -> Result<Self> {
        let parsed = ConnectionString::parse(input.trim())
            .map_err(|e| ConfigError::InvalidConnectionString(e.to_string()))?;
        Ok(Self { parsed })
    }

    /// Host of the first seed, or the SRV record name.
    ///
    /// `None` when the first seed is a Unix socket.
    pub fn primary_host(&self) -> Option<&str> {
        match &self.parsed.host_info {
            HostInfo::HostIdentifiers(hosts) => match hosts.first() {
                Some(ServerAddress::Tcp { host, .. }) => Some(host.as_str()),
                _ => None,
            },
            HostInfo::DnsRecord(record) => Some(record.as_str()),
            _ => None,
        }
    }

    /// Percent-decoded password from the userinfo part.
    pub fn password(&self) -> Option<&str> {
        self.parsed
            .credential
            .as_ref()
            .and_then(|credential| credential.password.as_deref())
    }

    pub fn default_database(&self) -> Option<&str> {
        self.parsed.default_database.as_deref()
    }
}

/// Base URL of the administrative endpoint on `host`.
///
/// IPv6 literals are bracketed.
pub fn management_endpoint(host: &str, port: u16) -> String {
    if host.contains(':') {
        format!("https://[{host}]:{port}/")
    } else {
        format!("https://{host}:{port}/")
    }
}
