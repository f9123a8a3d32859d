//! HTTP API over the todo store
//!
//! ## Routes
//!
//! - `GET /todos` - all todos, ordered by id
//! - `POST /todos` - create (201)
//! - `GET /todos/:id` - fetch one
//! - `PUT /todos/:id` - full replace
//! - `PATCH /todos/:id` - partial update
//! - `DELETE /todos/:id` - delete (204)
//! - `GET /health` - liveness plus item count
//!
//! `/todos/` (trailing slash) is accepted as well as `/todos`.
//!
//! ## Example
//!
//! ```ignore
//! let store = Arc::new(Store::open(&config)?);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! todo_server::api::serve(store, listener, shutdown_signal()).await?;
//! ```

use std::future::Future;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use todo_core::Store;

pub mod error;
pub mod handlers;

pub use error::ApiError;

use handlers::{
    create_todo, delete_todo, get_todo, health, list_todos, replace_todo, update_todo,
};

/// Build the axum `Router` serving the todo API from the given store.
pub fn router(store: Arc<Store>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/", get(list_todos).post(create_todo))
        .route(
            "/todos/:id",
            get(get_todo)
                .put(replace_todo)
                .patch(update_todo)
                .delete(delete_todo),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(store)
}

/// Serve the API on an already-bound listener until `shutdown` resolves.
pub async fn serve<S>(store: Arc<Store>, listener: TcpListener, shutdown: S) -> std::io::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown)
        .await
}
