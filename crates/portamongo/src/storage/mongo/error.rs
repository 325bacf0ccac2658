//! MongoDB error mapping.
//!
//! Maps `mongodb::error::Error` to `StorageError` from `portamongo_core::storage`.

use mongodb::error::{Error as MongoError, ErrorKind};
use portamongo_core::storage::StorageError;

/// Maps a driver error raised by `operation` against `target`.
///
/// # Error Mapping
///
/// - Server selection and I/O failures → `StorageError::ConnectionFailed`
/// - Every other failure → `StorageError::CommandFailed`
pub fn map_command_error(err: MongoError, operation: &'static str, target: &str) -> StorageError {
    match err.kind.as_ref() {
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) => {
            StorageError::ConnectionFailed(format!("{operation} on '{target}': {err}"))
        }
        _ => StorageError::CommandFailed {
            operation,
            target: target.to_string(),
            message: err.to_string(),
        },
    }
}

/// Maps a failed shard command. Any failure means sharding is unavailable here.
pub fn map_shard_error(err: MongoError, namespace: &str) -> StorageError {
    StorageError::ShardingUnsupported {
        namespace: namespace.to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn io_error() -> MongoError {
        MongoError::from(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ))
    }

    #[test]
    fn test_io_error_maps_to_connection_failed() {
        let result = map_command_error(io_error(), "list_collection_names", "Shop");

        assert!(matches!(result, StorageError::ConnectionFailed(_)));
    }

    #[test]
    fn test_shard_error_keeps_namespace() {
        let result = map_shard_error(io_error(), "Shop.Order");

        match result {
            StorageError::ShardingUnsupported { namespace, message } => {
                assert_eq!(namespace, "Shop.Order");
                assert!(message.contains("connection refused"));
            }
            other => panic!("Expected ShardingUnsupported, got {other:?}"),
        }
    }

    #[test]
    fn test_command_error_keeps_operation_and_target() {
        let err = MongoError::custom("unexpected reply".to_string());

        let result = map_command_error(err, "drop_collection", "Shop.Order");

        match result {
            StorageError::CommandFailed {
                operation,
                target,
                message,
            } => {
                assert_eq!(operation, "drop_collection");
                assert_eq!(target, "Shop.Order");
                assert!(message.contains("unexpected reply"));
            }
            other => panic!("Expected CommandFailed, got {other:?}"),
        }
    }
}
