//! Storage backends for the persisted cart.
//!
//! A backend is a single durable string slot: the cart reads it once on
//! load and overwrites it after every mutation. Backends do no locking;
//! two writers sharing one slot race and the last write wins.

mod file;
mod memory;

use std::fmt::Debug;

use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Storage key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "garval_cart";

/// Errors returned by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend has no room for the value.
    #[error("storage quota exceeded")]
    QuotaExceeded,

    /// The backend cannot be used at all.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A durable slot holding the serialized cart.
pub trait StorageBackend: Debug {
    /// Read the stored value.
    ///
    /// Returns `Ok(None)` if nothing has been stored yet.
    fn read(&self) -> Result<Option<String>, StorageError>;

    /// Replace the stored value.
    fn write(&self, value: &str) -> Result<(), StorageError>;
}

impl<T: StorageBackend + ?Sized> StorageBackend for Box<T> {
    fn read(&self) -> Result<Option<String>, StorageError> {
        (**self).read()
    }

    fn write(&self, value: &str) -> Result<(), StorageError> {
        (**self).write(value)
    }
}
