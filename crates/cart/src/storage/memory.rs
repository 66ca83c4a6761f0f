use std::sync::{Arc, Mutex, MutexGuard};

use super::{StorageBackend, StorageError};

/// In-process storage slot.
///
/// Clones share the same slot, so a test can hand one clone to a
/// [`CartStore`](crate::CartStore) and inspect what it wrote through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<Slot>>,
}

#[derive(Debug, Default)]
struct Slot {
    value: Option<String>,
    fail_writes: bool,
}

impl MemoryStorage {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot that already holds `value`.
    #[must_use]
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Slot {
                value: Some(value.into()),
                fail_writes: false,
            })),
        }
    }

    /// Make subsequent writes fail with [`StorageError::QuotaExceeded`].
    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut slot) = self.lock() {
            slot.fail_writes = fail;
        }
    }

    /// Current stored value.
    #[must_use]
    pub fn value(&self) -> Option<String> {
        self.lock().ok().and_then(|slot| slot.value.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Slot>, StorageError> {
        self.inner
            .lock()
            .map_err(|_| StorageError::Unavailable("memory slot lock poisoned".to_string()))
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.value.clone())
    }

    fn write(&self, value: &str) -> Result<(), StorageError> {
        let mut slot = self.lock()?;
        if slot.fail_writes {
            return Err(StorageError::QuotaExceeded);
        }
        slot.value = Some(value.to_owned());
        Ok(())
    }
}
