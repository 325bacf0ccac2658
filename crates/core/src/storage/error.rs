use thiserror::Error;

/// Errors that can occur during collection-level operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Collection '{collection}' not found in database '{database}'")]
    NotFound {
        database: String,
        collection: String,
    },
    #[error("{operation} failed for '{target}': {message}")]
    CommandFailed {
        operation: &'static str,
        target: String,
        message: String,
    },
    /// Raised by [`DocumentStore::shard_collection`](super::DocumentStore::shard_collection).
    /// Callers recover from it by creating an unsharded collection.
    #[error("Sharded creation of '{namespace}' failed: {message}")]
    ShardingUnsupported { namespace: String, message: String },
    #[error("{0} was cancelled")]
    Cancelled(&'static str),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let error = StorageError::NotFound {
            database: "Shop".to_string(),
            collection: "Order".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Collection 'Order' not found in database 'Shop'"
        );
    }

    #[test]
    fn test_command_failed_display() {
        let error = StorageError::CommandFailed {
            operation: "create_collection",
            target: "Shop.Order".to_string(),
            message: "not authorized".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "create_collection failed for 'Shop.Order': not authorized"
        );
    }

    #[test]
    fn test_sharding_unsupported_display() {
        let error = StorageError::ShardingUnsupported {
            namespace: "Shop.Order".to_string(),
            message: "no such command: 'shardCollection'".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Sharded creation of 'Shop.Order' failed: no such command: 'shardCollection'"
        );
    }

    #[test]
    fn test_cancelled_display() {
        let error = StorageError::Cancelled("list_collection_names");
        assert_eq!(error.to_string(), "list_collection_names was cancelled");
    }
}
