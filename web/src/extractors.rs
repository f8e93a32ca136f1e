//! Custom Axum extractors.
//!
//! - [`CorrelationId`]: the request's correlation ID
//! - [`ValidJson`]: JSON body whose rejections render as 400 [`AppError`]s
//! - [`ValidQuery`]: query string whose rejections render as 400 [`AppError`]s
//! - [`TodoIdPath`]: a todo id from the path; anything non-numeric is a 404

use crate::error::AppError;
use crate::middleware::correlation_id_from_headers;
use axum::{
    Json, async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use ezratask_core::{TodoId, ValidationError};
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Correlation ID for request tracing.
///
/// Taken from the request extensions when the correlation middleware is
/// installed, otherwise from the `X-Correlation-ID` header, otherwise a new
/// UUID v4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<Self>() {
            return Ok(*id);
        }
        Ok(Self(
            correlation_id_from_headers(&parts.headers).unwrap_or_else(Uuid::new_v4),
        ))
    }
}

/// JSON body extractor reporting malformed input as a 400 validation error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::validation(ValidationError::field(
                "body",
                rejection.body_text(),
            ))),
        }
    }
}

/// Query string extractor reporting unparseable values as a 400 validation error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::validation(ValidationError::field(
                "query",
                rejection.body_text(),
            ))),
        }
    }
}

/// Todo id taken from the `:id` path segment.
///
/// Ids that are not unsigned integers cannot name a todo, so they are
/// reported as not found rather than as bad requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoIdPath(pub TodoId);

#[async_trait]
impl<S> FromRequestParts<S> for TodoIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::not_found("Todo", rejection.body_text()))?;

        raw.parse::<TodoId>()
            .map(Self)
            .map_err(|_| AppError::not_found("Todo", raw))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::{get, post},
    };
    use ezratask_core::PageRequest;
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route(
                "/items/:id",
                get(|TodoIdPath(id): TodoIdPath| async move { id.to_string() }),
            )
            .route(
                "/page",
                get(|ValidQuery(q): ValidQuery<PageRequest>| async move { q.page_size.to_string() }),
            )
            .route(
                "/echo",
                post(|ValidJson(v): ValidJson<serde_json::Value>| async move { v.to_string() }),
            )
    }

    async fn status_of(request: Request<Body>) -> StatusCode {
        app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_numeric_path_id() {
        let request = Request::builder().uri("/items/42").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_non_numeric_path_id_is_not_found() {
        let request = Request::builder().uri("/items/abc").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unparseable_query_is_bad_request() {
        let request = Request::builder()
            .uri("/page?pageSize=lots")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/echo")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_correlation_id_from_header_without_middleware() {
        let id = Uuid::new_v4();
        let app = Router::new().route("/", get(|c: CorrelationId| async move { c.0.to_string() }));
        let request = Request::builder()
            .uri("/")
            .header("X-Correlation-ID", id.to_string())
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes, id.to_string().as_bytes());
    }
}
