//! Router configuration.
//!
//! Builds the complete Axum router with all endpoints and layers.

use crate::config::ApiConfig;
use crate::handlers::{admin, health, todos};
use crate::middleware::correlation_id_layer;
use crate::state::AppState;
use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    routing::{get, patch, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Path of the test-only reset endpoint.
pub const RESET_PATH: &str = "/api/v1/test/reset";

/// Build the complete Axum router.
///
/// - `GET /health`, `GET /health/ready`, `GET /metrics`
/// - the todo resource under `/api/v1/todos`
/// - `POST /api/v1/test/reset`, only when `api.enable_test_endpoints` is set
pub fn build_router(state: AppState, api: &ApiConfig) -> Router {
    let base = todos::TODOS_PATH;

    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route(base, get(todos::list_todos).post(todos::create_todo))
        .route(&format!("{base}/:id"), get(todos::get_todo))
        .route(
            &format!("{base}/:id/toggle-completion"),
            patch(todos::toggle_completion),
        )
        .route(&format!("{base}/:id/archive"), patch(todos::archive_todo));

    if api.metrics_enabled {
        router = router.route("/metrics", get(admin::metrics));
    }

    if api.enable_test_endpoints {
        tracing::warn!(path = RESET_PATH, "Test endpoints enabled");
        router = router.route(RESET_PATH, post(admin::reset_state));
    }

    router
        .layer(cors_layer(&api.cors_origins))
        .layer(correlation_id_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the listed origins, with credentials allowed.
///
/// Origins that are not valid header values are skipped, and so is the
/// wildcard, which cannot be combined with credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) if value != "*" => Some(value),
            _ => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let correlation = HeaderName::from_static("x-correlation-id");

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, correlation.clone()])
        .expose_headers([header::LOCATION, correlation])
        .allow_credentials(true)
}
