//! Error types for web handlers.
//!
//! [`AppError`] bridges domain failures and HTTP responses. Validation
//! failures carry per-field messages so clients can show them next to inputs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ezratask_core::{TodoRejection, ValidationError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Application error type for web handlers.
///
/// # Examples
///
/// ```ignore
/// async fn handler(State(state): State<AppState>, Path(id): Path<String>)
///     -> Result<Json<TodoDto>, AppError>
/// {
///     let id = parse_todo_id(&id)?;
///     let todo = state.store.get(id).await
///         .ok_or_else(|| AppError::not_found("Todo", id))?;
///     Ok(Json(todo.into()))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: &'static str,
    /// Per-field validation messages
    errors: Option<BTreeMap<String, Vec<String>>>,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>, code: &'static str) -> Self {
        Self {
            status,
            message: message.into(),
            code,
            errors: None,
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, "BAD_REQUEST")
    }

    /// Create a 400 validation error carrying field messages.
    #[must_use]
    pub fn validation(error: ValidationError) -> Self {
        let mut app_error = Self::new(StatusCode::BAD_REQUEST, error.to_string(), "VALIDATION_ERROR");
        app_error.errors = Some(error.into_errors());
        app_error
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{resource} with id {id} not found"),
            "NOT_FOUND",
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message,
            "INTERNAL_SERVER_ERROR",
        )
    }

    /// HTTP status of the response this error renders to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: &'static str,
    /// Human-readable error message.
    message: String,
    /// Field messages, present for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<BTreeMap<String, Vec<String>>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            match &self.source {
                Some(source) => tracing::error!(
                    status = %self.status,
                    code = self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                ),
                None => tracing::error!(
                    status = %self.status,
                    code = self.code,
                    message = %self.message,
                    "Internal server error"
                ),
            }
        } else {
            tracing::debug!(status = %self.status, code = self.code, message = %self.message, "Request rejected");
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
            errors: self.errors,
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::validation(err)
    }
}

impl From<TodoRejection> for AppError {
    fn from(rejection: TodoRejection) -> Self {
        match rejection {
            TodoRejection::Invalid(err) => Self::validation(err),
            TodoRejection::NotFound(id) => Self::not_found("Todo", id),
        }
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_not_found() {
        let err = AppError::not_found("Todo", 123);
        assert_eq!(err.to_string(), "[NOT_FOUND] Todo with id 123 not found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_is_bad_request() {
        let err = AppError::from(ValidationError::field("description", "Too short."));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_rejections_map_to_statuses() {
        let err = AppError::from(TodoRejection::NotFound(ezratask_core::TodoId::new(9)));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "[NOT_FOUND] Todo with id 9 not found");

        let err = AppError::from(TodoRejection::Invalid(ValidationError::field(
            "description",
            "Too short.",
        )));
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_validation_body_lists_fields() {
        let response =
            AppError::validation(ValidationError::field("pageSize", "Out of range.")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["errors"]["pageSize"][0], "Out of range.");
    }

    #[tokio::test]
    async fn test_not_found_body_has_no_field_errors() {
        let response = AppError::not_found("Todo", 5).into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body.get("errors").is_none());
    }
}
