//! Storage layer
//!
//! Handles persistence of the store state as a single JSON file that is
//! rewritten atomically after every mutation.

pub mod error;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use persistence::{JsonPersistence, LoadedFile, StoreFile};
