//! Cosmos DB REST error mapping.
//!
//! Maps transport failures and non-success statuses to `ProvisioningError`.

use portamongo_core::provisioning::ProvisioningError;
use reqwest::StatusCode;

/// Maps a transport-level failure (DNS, TLS, connection refused...).
pub fn map_transport_error(
    err: reqwest::Error,
    operation: &'static str,
    database: &str,
) -> ProvisioningError {
    ProvisioningError::Request {
        operation,
        database: database.to_string(),
        message: format!("request failed: {err}"),
    }
}

/// Maps a response whose status the operation does not accept.
pub fn map_status_error(
    status: StatusCode,
    body: &str,
    operation: &'static str,
    database: &str,
) -> ProvisioningError {
    let body = body.trim();
    let message = if body.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {body}")
    };

    ProvisioningError::Request {
        operation,
        database: database.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_includes_body() {
        let error = map_status_error(
            StatusCode::UNAUTHORIZED,
            r#"{"code":"Unauthorized"}"#,
            "create_database",
            "Shop",
        );

        assert_eq!(
            error.to_string(),
            r#"create_database failed for database 'Shop': 401 Unauthorized: {"code":"Unauthorized"}"#
        );
    }

    #[test]
    fn test_status_error_without_body() {
        let error = map_status_error(StatusCode::FORBIDDEN, "  ", "replace_offer", "Shop");

        assert_eq!(
            error.to_string(),
            "replace_offer failed for database 'Shop': 403 Forbidden"
        );
    }
}
