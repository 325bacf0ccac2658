mod error;
mod traits;

pub use error::{Result, StorageError};
pub use traits::DocumentStore;
