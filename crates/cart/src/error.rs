//! Cart error type.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by an explicit [`CartStore::save`](crate::CartStore::save).
///
/// Mutating operations never return these; they log and keep the
/// in-memory cart instead.
#[derive(Debug, Error)]
pub enum CartError {
    /// The storage backend rejected the write.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
