//! Correlation ID middleware.
//!
//! Every request gets a correlation ID: the one sent in `X-Correlation-ID` if
//! it parses as a UUID, otherwise a fresh v4 UUID. The ID is stored in the
//! request extensions as a [`CorrelationId`], recorded on an `http_request`
//! tracing span that wraps the handler, and echoed back in the response
//! header.
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/health", get(health_check))
//!     .layer(correlation_id_layer());
//! ```

use crate::extractors::CorrelationId;
use axum::{extract::Request, http::HeaderValue, response::Response};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

/// Header name for correlation ID.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Create a layer that adds correlation ID tracking to all requests.
#[must_use]
pub const fn correlation_id_layer() -> CorrelationIdLayer {
    CorrelationIdLayer
}

/// Layer for correlation ID tracking.
#[derive(Clone, Copy, Debug)]
pub struct CorrelationIdLayer;

impl<S> Layer<S> for CorrelationIdLayer {
    type Service = CorrelationIdMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CorrelationIdMiddleware { inner }
    }
}

/// Middleware service for correlation ID tracking.
#[derive(Clone, Debug)]
pub struct CorrelationIdMiddleware<S> {
    inner: S,
}

/// Reads a usable correlation ID from the request headers.
pub(crate) fn correlation_id_from_headers(headers: &axum::http::HeaderMap) -> Option<Uuid> {
    headers
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
}

impl<S> Service<Request> for CorrelationIdMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let id = correlation_id_from_headers(req.headers()).unwrap_or_else(Uuid::new_v4);
        req.extensions_mut().insert(CorrelationId(id));

        let span = tracing::info_span!(
            "http_request",
            correlation_id = %id,
            method = %req.method(),
            path = %req.uri().path(),
        );
        let fut = self.inner.call(req).instrument(span);

        Box::pin(async move {
            let mut response = fut.await?;
            if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
                response.headers_mut().insert(CORRELATION_ID_HEADER, value);
            }
            Ok(response)
        })
    }
}
