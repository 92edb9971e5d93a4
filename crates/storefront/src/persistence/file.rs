//! Filesystem slot backend.
//!
//! Each key maps to one file inside the data directory. Writes go to a
//! sibling temp file first and are renamed into place, so a crash mid-write
//! leaves the previous value intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{PersistenceSlot, SlotError, validate_key};

/// Slot backend storing one file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    /// Create a slot rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the slot files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    ///
    /// # Errors
    ///
    /// Returns `SlotError::InvalidKey` if the key is not `[a-z0-9_]+`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, SlotError> {
        validate_key(key)?;
        Ok(self.dir.join(key))
    }
}

impl PersistenceSlot for FileSlot {
    fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SlotError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SlotError> {
        let path = self.path_for(key)?;
        let io_err = |source| SlotError::Io {
            key: key.to_owned(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(io_err)?;

        let tmp = self.dir.join(format!(".{key}.tmp"));
        std::fs::write(&tmp, value).map_err(io_err)?;
        if let Err(source) = std::fs::rename(&tmp, &path) {
            if let Err(e) = std::fs::remove_file(&tmp) {
                tracing::debug!(error = %e, path = %tmp.display(), "temp file not removed");
            }
            return Err(io_err(source));
        }

        tracing::trace!(path = %path.display(), bytes = value.len(), "slot written");
        Ok(())
    }
}
