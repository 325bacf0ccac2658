//! Throughput policy for managed-cloud databases (pure functions).

/// The service never allows a database below this many units.
pub const MIN_THROUGHPUT: u32 = 400;

/// Units allocated for every collection in the database.
pub const THROUGHPUT_PER_COLLECTION: u32 = 100;

/// Throughput requested when a managed-cloud database is first created.
pub const DEFAULT_INITIAL_THROUGHPUT: u32 = 2000;

/// Computes `max(400, collection_count * 100)`, saturating on overflow.
pub fn throughput_for_collections(collection_count: usize) -> u32 {
    u32::try_from(collection_count)
        .unwrap_or(u32::MAX)
        .saturating_mul(THROUGHPUT_PER_COLLECTION)
        .max(MIN_THROUGHPUT)
}
