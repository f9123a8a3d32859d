//! HTTP error mapping
//!
//! Every failure leaves the API as `{"detail": "<message>"}` with a status
//! code chosen here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use todo_core::StorageError;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Todo not found")]
    NotFound,

    #[error("Invalid todo id '{0}': must be an integer >= 1")]
    InvalidId(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error")]
    Storage(#[from] StorageError),

    /// A blocking store task panicked or was cancelled
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidId(_) | ApiError::InvalidBody(_) | ApiError::Validation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Storage(e) => {
                tracing::error!(
                    error = %e,
                    recoverable = e.is_recoverable(),
                    hint = e.recovery_suggestion().unwrap_or("none"),
                    "Store write failed"
                );
            }
            ApiError::Internal(details) => {
                tracing::error!(%details, "Store task failed");
            }
            _ => {}
        }

        let body = json!({ "detail": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::InvalidId("0".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(ValidationError::EmptyTitle).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let storage = StorageError::from_io(
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            PathBuf::from("/data/todos.json"),
        );
        assert_eq!(
            ApiError::from(storage).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_details_stay_out_of_message() {
        let storage = StorageError::from_io(
            io::Error::new(io::ErrorKind::Other, "No space left on device"),
            PathBuf::from("/secret/path/todos.json"),
        );
        let msg = ApiError::from(storage).to_string();
        assert_eq!(msg, "Storage error");
    }
}
