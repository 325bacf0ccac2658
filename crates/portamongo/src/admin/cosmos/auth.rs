//! Master-key request signing for the Cosmos DB REST endpoint.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use portamongo_core::provisioning::{ProvisioningError, Result};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Decoded account key. Never printed.
#[derive(Clone)]
pub struct MasterKey(Vec<u8>);

impl MasterKey {
    pub fn from_base64(encoded: &str) -> Result<Self> {
        STANDARD
            .decode(encoded.trim())
            .map(Self)
            .map_err(|e| {
                ProvisioningError::Configuration(format!("Management key is not valid base64: {e}"))
            })
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey(***)")
    }
}

/// Formats a timestamp the way `x-ms-date` expects (RFC 1123).
pub fn rfc1123_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Builds the url-encoded `authorization` header value for one request.
///
/// `resource_link` is signed verbatim; verb, resource type and date are
/// lower-cased.
pub fn authorization_token(
    key: &MasterKey,
    verb: &str,
    resource_type: &str,
    resource_link: &str,
    date: &str,
) -> Result<String> {
    let payload = format!(
        "{}\n{}\n{}\n{}\n\n",
        verb.to_lowercase(),
        resource_type.to_lowercase(),
        resource_link,
        date.to_lowercase()
    );

    let mut mac = HmacSha256::new_from_slice(&key.0)
        .map_err(|e| ProvisioningError::Configuration(format!("Unusable management key: {e}")))?;
    mac.update(payload.as_bytes());
    let signature = STANDARD.encode(mac.finalize().into_bytes());

    Ok(urlencoding::encode(&format!("type=master&ver=1.0&sig={signature}")).into_owned())
}
