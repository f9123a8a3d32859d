//! Todo Core Library
//!
//! This crate provides the storage core of the todo service: an in-memory
//! map of todo items guarded by a mutex and persisted to a single JSON file
//! that is rewritten atomically after every change.
//!
//! # Quick Start
//!
//! ```text
//! let store = Store::open(&Config::load()?)?;
//!
//! let todo = store.create(NewTodo::new("Buy milk"))?;
//! store.update(todo.id, TodoPatch::default().completed(true))?;
//!
//! let todos = store.list();
//! ```
//!
//! # Modules
//!
//! - `store`: The todo store (main entry point)
//! - `models`: Todo record and its create/update inputs
//! - `storage`: JSON file persistence and storage errors
//! - `config`: Application configuration

pub mod config;
pub mod models;
pub mod storage;
pub mod store;

pub use config::Config;
pub use models::{NewTodo, Todo, TodoPatch};
pub use storage::{StorageError, StorageResult};
pub use store::{LoadOutcome, Store};
