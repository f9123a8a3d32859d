//! Todo Server
//!
//! HTTP front end for the todo store: routing, request validation and
//! status mapping over `todo_core::Store`.

pub mod api;
pub mod logging;
pub mod validation;

pub use api::{router, serve, ApiError};
