use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{StorageBackend, StorageError};

/// Storage slot backed by a JSON file at `<dir>/<key>.json`.
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so readers never observe a half-written cart.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create a file slot for `key` inside `dir`.
    ///
    /// The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl StorageBackend for FileStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, value: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp = self.temp_path();
        fs::write(&temp, value)?;
        fs::rename(&temp, &self.path)?;

        tracing::trace!(path = %self.path.display(), bytes = value.len(), "Cart file written");
        Ok(())
    }
}
