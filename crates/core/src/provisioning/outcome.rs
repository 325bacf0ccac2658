//! Outcome of a throughput scaling pass.

/// What `scale_throughput` ended up doing.
///
/// Every variant except `Scaled` is a successful no-op: scaling is advisory
/// and only meaningful once the database, its collections and its offer exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaleOutcome {
    /// The deployment has no throughput to manage.
    NotManaged,
    /// The administrative endpoint does not know the database.
    DatabaseMissing { database: String },
    /// The collection feed was unavailable or empty.
    NoCollections { database: String },
    /// The database has no throughput offer of its own.
    NoOffer { database: String },
    /// The offer was replaced.
    Scaled {
        database: String,
        collection_count: usize,
        previous: u32,
        target: u32,
    },
}

impl ScaleOutcome {
    /// Returns true if an offer replacement was issued.
    pub fn is_scaled(&self) -> bool {
        matches!(self, Self::Scaled { .. })
    }

    /// One-line summary for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::NotManaged => "= Throughput is not managed for this location".to_string(),
            Self::DatabaseMissing { database } => {
                format!("= Database '{}' not found, nothing to scale", database)
            }
            Self::NoCollections { database } => {
                format!("= Database '{}' has no collections, nothing to scale", database)
            }
            Self::NoOffer { database } => {
                format!("= Database '{}' has no throughput offer", database)
            }
            Self::Scaled {
                database,
                collection_count,
                previous,
                target,
            } => format!(
                "~ Database '{}': {} -> {} RU/s ({} collections)",
                database, previous, target, collection_count
            ),
        }
    }
}
