/// Name of the identity field. Every sharded collection is partitioned on it.
pub const IDENTITY_FIELD: &str = "_id";

/// Index kind used for the partition key of sharded collections.
pub const HASHED: &str = "hashed";

/// Returns the type's own name, without module path or generic arguments.
///
/// ```
/// use portamongo_core::collection::simple_type_name;
///
/// struct Order;
/// assert_eq!(simple_type_name::<Order>(), "Order");
/// assert_eq!(simple_type_name::<Vec<Order>>(), "Vec");
/// ```
pub fn simple_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::").next().unwrap_or(path)
}

/// Collection name and partition key derived from an entity type.
///
/// Not stored anywhere: it is recomputed from the type on every use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDescriptor {
    name: &'static str,
    partition_key: &'static str,
}

impl CollectionDescriptor {
    pub fn of<T: ?Sized>() -> Self {
        Self {
            name: simple_type_name::<T>(),
            partition_key: IDENTITY_FIELD,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn partition_key(&self) -> &'static str {
        self.partition_key
    }

    /// Fully qualified `database.collection` namespace.
    pub fn namespace(&self, database: &str) -> String {
        format!("{}.{}", database, self.name)
    }
}

/// How a `create_collection` call was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionCreation {
    /// The collection was already present; nothing was issued.
    AlreadyExists,
    /// Created through the shard command with a hashed partition key.
    Sharded,
    /// Sharding failed and the collection was created without a partition key.
    Unsharded,
}
