//! Todo store
//!
//! The `Store` is the single source of truth for todo items. It keeps every
//! record in memory behind one exclusive lock and rewrites the JSON data file
//! after each successful mutation.
//!
//! ## Write path
//!
//! Every mutation runs entirely under the lock:
//! 1. Stage the change on a copy of the current state
//! 2. Persist the staged state (temp file + rename)
//! 3. Commit the staged state in memory
//!
//! If step 2 fails the in-memory state is untouched, so memory never runs
//! ahead of disk.
//!
//! ## Usage
//!
//! ```ignore
//! let store = Store::open(&Config::load()?)?;
//!
//! let todo = store.create(NewTodo::new("Buy milk"))?;
//! let done = store.update(todo.id, TodoPatch::default().completed(true))?;
//! let all = store.list();
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::models::{NewTodo, Todo, TodoPatch};
use crate::storage::{JsonPersistence, LoadedFile, StorageError, StorageResult, StoreFile};

/// What `Store::open` found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No data file existed; started empty
    Fresh,
    /// Data file loaded
    Loaded { items: usize },
    /// Data file was unparsable; started empty
    Recovered {
        details: String,
        /// Where the unparsable file was copied, if the copy succeeded
        backup: Option<PathBuf>,
    },
}

#[derive(Debug, Clone)]
struct State {
    items: BTreeMap<u64, Todo>,
    next_id: u64,
}

impl Default for State {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl State {
    /// Build the in-memory state from a parsed file
    ///
    /// Rejects duplicate IDs and an item ID of `u64::MAX`.
    fn from_file(file: StoreFile, path: &Path) -> Result<Self, String> {
        let mut items = BTreeMap::new();
        for todo in file.items {
            let id = todo.id;
            if items.insert(id, todo).is_some() {
                return Err(format!("duplicate todo id {}", id));
            }
        }

        let floor = match items.keys().next_back() {
            None => 1,
            Some(&max) => max
                .checked_add(1)
                .ok_or_else(|| format!("todo id {} leaves no room for new ids", max))?,
        };
        let next_id = if file.next_id < floor {
            warn!(
                path = %path.display(),
                stored = file.next_id,
                repaired = floor,
                "next_id behind stored items, repairing"
            );
            floor
        } else {
            file.next_id
        };

        Ok(Self { items, next_id })
    }
}

/// File-backed todo store
///
/// All operations, reads included, are serialized by a single mutex.
/// Share it across threads as `Arc<Store>`.
pub struct Store {
    state: Mutex<State>,
    persistence: JsonPersistence,
    outcome: LoadOutcome,
}

impl Store {
    /// Open the store at the configured data file
    pub fn open(config: &Config) -> StorageResult<Self> {
        Self::open_at(config.data_file())
    }

    /// Open the store backed by a specific data file
    ///
    /// - Creates the parent directory if needed
    /// - Missing file: starts empty with `next_id = 1`
    /// - Unparsable file, or one with duplicate or exhausted IDs: logs a
    ///   warning, copies it aside, starts empty
    /// - Unreadable file: returns the read error
    pub fn open_at(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let persistence = JsonPersistence::new(path);
        persistence.ensure_dir()?;

        let loaded = match persistence.load()? {
            LoadedFile::Missing => None,
            LoadedFile::Parsed(file) => Some(State::from_file(file, persistence.path())),
            LoadedFile::Malformed { details } => Some(Err(details)),
        };
        let (state, outcome) = match loaded {
            None => (State::default(), LoadOutcome::Fresh),
            Some(Ok(state)) => {
                let items = state.items.len();
                (state, LoadOutcome::Loaded { items })
            }
            Some(Err(details)) => {
                warn!(
                    path = %persistence.path().display(),
                    %details,
                    "Data file is malformed, starting with an empty store"
                );
                let backup = persistence.backup_corrupt();
                (State::default(), LoadOutcome::Recovered { details, backup })
            }
        };

        info!(
            path = %persistence.path().display(),
            items = state.items.len(),
            next_id = state.next_id,
            "Store opened"
        );

        Ok(Self {
            state: Mutex::new(state),
            persistence,
            outcome,
        })
    }

    /// What was found on disk when the store was opened
    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.outcome
    }

    /// Path of the backing data file
    pub fn path(&self) -> &Path {
        self.persistence.path()
    }

    // ==================== Reads ====================

    /// All items ordered by ascending ID
    pub fn list(&self) -> Vec<Todo> {
        self.lock().items.values().cloned().collect()
    }

    /// Look up a single item
    pub fn get(&self, id: u64) -> Option<Todo> {
        self.lock().items.get(&id).cloned()
    }

    /// Number of stored items
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The ID the next `create` will assign
    pub fn next_id(&self) -> u64 {
        self.lock().next_id
    }

    // ==================== Writes ====================

    /// Create a new item with the next ID
    pub fn create(&self, fields: NewTodo) -> StorageResult<Todo> {
        let mut state = self.lock();
        let mut staged = state.clone();

        let id = staged.next_id;
        staged.next_id = id
            .checked_add(1)
            .ok_or(StorageError::IdsExhausted { next_id: id })?;
        let todo = Todo::new(id, fields, Utc::now());
        staged.items.insert(id, todo.clone());

        self.commit(&mut state, staged)?;
        Ok(todo)
    }

    /// Replace every field of an item except `id` and `created_at`
    ///
    /// Returns `Ok(None)` without writing if the item doesn't exist.
    pub fn replace(&self, id: u64, fields: NewTodo) -> StorageResult<Option<Todo>> {
        self.mutate(|state| {
            let todo = state.items.get_mut(&id)?;
            todo.replace_with(fields, Utc::now());
            Some(todo.clone())
        })
    }

    /// Apply the supplied fields of a patch to an item
    ///
    /// Returns `Ok(None)` without writing if the item doesn't exist.
    pub fn update(&self, id: u64, patch: TodoPatch) -> StorageResult<Option<Todo>> {
        self.mutate(|state| {
            let todo = state.items.get_mut(&id)?;
            todo.apply(patch, Utc::now());
            Some(todo.clone())
        })
    }

    /// Remove an item
    ///
    /// Returns `Ok(false)` without writing if the item doesn't exist.
    pub fn delete(&self, id: u64) -> StorageResult<bool> {
        let removed = self.mutate(|state| state.items.remove(&id))?;
        Ok(removed.is_some())
    }

    // ==================== Internals ====================

    fn lock(&self) -> MutexGuard<'_, State> {
        // State is only replaced after a successful write, so a panic while
        // holding the lock cannot leave it half-updated
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stage a change, persist it, then commit it
    ///
    /// `change` returning `None` means nothing matched: no write happens.
    fn mutate<T>(&self, change: impl FnOnce(&mut State) -> Option<T>) -> StorageResult<Option<T>> {
        let mut state = self.lock();
        let mut staged = state.clone();

        let Some(result) = change(&mut staged) else {
            return Ok(None);
        };

        self.commit(&mut state, staged)?;
        Ok(Some(result))
    }

    /// Persist `staged` and make it the current state
    fn commit(&self, state: &mut State, staged: State) -> StorageResult<()> {
        if let Err(e) = self.persistence.save(staged.next_id, staged.items.values()) {
            error!(
                path = %self.persistence.path().display(),
                error = %e,
                "Failed to persist store, change discarded"
            );
            return Err(e);
        }

        *state = staged;
        Ok(())
    }
}
