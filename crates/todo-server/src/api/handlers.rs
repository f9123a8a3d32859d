//! Route handlers for `/todos`
//!
//! Store calls take a mutex and write files synchronously, so each one runs
//! on tokio's blocking pool.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use todo_core::{NewTodo, Store, Todo, TodoPatch};

use super::error::ApiError;
use crate::validation::{validate_new, validate_patch};

/// `GET /health`
pub async fn health(State(store): State<Arc<Store>>) -> Result<Json<Value>, ApiError> {
    let items = with_store(&store, |store| Ok(store.len())).await?;
    Ok(Json(json!({ "status": "ok", "items": items })))
}

/// `GET /todos`
pub async fn list_todos(State(store): State<Arc<Store>>) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = with_store(&store, |store| Ok(store.list())).await?;
    Ok(Json(todos))
}

/// `POST /todos`
pub async fn create_todo(
    State(store): State<Arc<Store>>,
    body: Result<Json<NewTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let Json(fields) = body.map_err(invalid_body)?;
    validate_new(&fields)?;

    let todo = with_store(&store, move |store| Ok(store.create(fields)?)).await?;
    tracing::info!(id = todo.id, "Created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// `GET /todos/:id`
pub async fn get_todo(
    State(store): State<Arc<Store>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&raw_id)?;
    let todo = with_store(&store, move |store| store.get(id).ok_or(ApiError::NotFound)).await?;
    Ok(Json(todo))
}

/// `PUT /todos/:id`
pub async fn replace_todo(
    State(store): State<Arc<Store>>,
    Path(raw_id): Path<String>,
    body: Result<Json<NewTodo>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&raw_id)?;
    let Json(fields) = body.map_err(invalid_body)?;
    validate_new(&fields)?;

    let todo = with_store(&store, move |store| {
        store.replace(id, fields)?.ok_or(ApiError::NotFound)
    })
    .await?;
    Ok(Json(todo))
}

/// `PATCH /todos/:id`
pub async fn update_todo(
    State(store): State<Arc<Store>>,
    Path(raw_id): Path<String>,
    body: Result<Json<TodoPatch>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&raw_id)?;
    let Json(patch) = body.map_err(invalid_body)?;
    validate_patch(&patch)?;

    let todo = with_store(&store, move |store| {
        store.update(id, patch)?.ok_or(ApiError::NotFound)
    })
    .await?;
    Ok(Json(todo))
}

/// `DELETE /todos/:id`
pub async fn delete_todo(
    State(store): State<Arc<Store>>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw_id)?;
    let deleted = with_store(&store, move |store| Ok(store.delete(id)?)).await?;

    if !deleted {
        return Err(ApiError::NotFound);
    }
    tracing::info!(id, "Deleted todo");
    Ok(StatusCode::NO_CONTENT)
}

/// Run a store operation on the blocking pool
async fn with_store<T, F>(store: &Arc<Store>, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&Store) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
}

/// IDs are positive integers
fn parse_id(raw: &str) -> Result<u64, ApiError> {
    match raw.parse::<u64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(ApiError::InvalidId(raw.to_string())),
    }
}

fn invalid_body(rejection: JsonRejection) -> ApiError {
    ApiError::InvalidBody(rejection.body_text())
}
