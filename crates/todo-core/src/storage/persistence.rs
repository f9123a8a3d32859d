//! JSON file persistence
//!
//! Handles saving and loading the store state to/from the filesystem.
//! Uses atomic writes (write to temp file, then rename) to prevent corruption.
//!
//! Storage location: `~/.local/share/todo-server/` (configurable via `Config`)
//!
//! Files:
//! - `todos.json` - `{ "next_id": n, "items": [...] }`
//! - `todos.tmp` - transient, only exists mid-write
//! - `todos.json.corrupt` - copy of an unparsable file set aside on load

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::Todo;

use super::error::{StorageError, StorageResult};

/// On-disk shape of the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreFile {
    #[serde(default = "first_id")]
    pub next_id: u64,
    #[serde(default)]
    pub items: Vec<Todo>,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            next_id: first_id(),
            items: Vec::new(),
        }
    }
}

fn first_id() -> u64 {
    1
}

/// Borrowed form of [`StoreFile`] used when writing
#[derive(Serialize)]
struct StoreFileRef<'a> {
    next_id: u64,
    items: Vec<&'a Todo>,
}

/// Result of reading the data file
#[derive(Debug)]
pub enum LoadedFile {
    /// No data file yet
    Missing,
    /// File parsed successfully
    Parsed(StoreFile),
    /// File exists but its content is not a valid store
    Malformed { details: String },
}

/// Persistence layer for the store file
///
/// Provides atomic file operations for saving/loading state.
#[derive(Debug, Clone)]
pub struct JsonPersistence {
    path: PathBuf,
}

impl JsonPersistence {
    /// Create a persistence handler for the given data file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the data file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the directory holding the data file, if missing
    pub fn ensure_dir(&self) -> StorageResult<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
                    path: parent.to_path_buf(),
                    source,
                })
            }
            _ => Ok(()),
        }
    }

    /// Read and parse the data file
    ///
    /// Unparsable content is reported as [`LoadedFile::Malformed`], not as
    /// an error. I/O failures while reading an existing file are errors.
    pub fn load(&self) -> StorageResult<LoadedFile> {
        if !self.path.exists() {
            return Ok(LoadedFile::Missing);
        }

        let bytes =
            fs::read(&self.path).map_err(|e| StorageError::from_read(e, self.path.clone()))?;

        match serde_json::from_slice::<StoreFile>(&bytes) {
            Ok(file) => Ok(LoadedFile::Parsed(file)),
            Err(e) => Ok(LoadedFile::Malformed {
                details: e.to_string(),
            }),
        }
    }

    /// Write the full store state using an atomic write
    pub fn save<'a>(
        &self,
        next_id: u64,
        items: impl IntoIterator<Item = &'a Todo>,
    ) -> StorageResult<()> {
        let snapshot = StoreFileRef {
            next_id,
            items: items.into_iter().collect(),
        };
        let bytes = serde_json::to_vec_pretty(&snapshot)?;

        atomic_write(&self.path, &bytes)?;
        debug!(
            path = %self.path.display(),
            items = snapshot.items.len(),
            next_id,
            "Persisted store"
        );
        Ok(())
    }

    /// Copy an unparsable data file aside so it is not lost on the next write
    ///
    /// Returns the backup path, or `None` if the copy failed.
    pub fn backup_corrupt(&self) -> Option<PathBuf> {
        let backup = corrupt_backup_path(&self.path);
        match fs::copy(&self.path, &backup) {
            Ok(_) => Some(backup),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Could not back up corrupt data file"
                );
                None
            }
        }
    }
}

fn corrupt_backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".corrupt");
    PathBuf::from(name)
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("tmp");

    if let Err(e) = write_synced(&temp_path, data) {
        let _ = fs::remove_file(&temp_path);
        return Err(StorageError::from_io(e, temp_path));
    }

    if let Err(source) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(StorageError::AtomicWriteFailed {
            from: temp_path,
            to: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}

fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}
