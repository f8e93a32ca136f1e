//! Operational endpoints: metrics and the test-only reset.

use crate::WebResult;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use ezratask_core::TodoAction;

/// Prometheus text exposition.
///
/// Responds `404` when this process did not install the recorder.
pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Some(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Clear every todo and restart ids.
///
/// Only routed when test endpoints are enabled.
pub async fn reset_state(State(state): State<AppState>) -> WebResult<StatusCode> {
    state.store.send(TodoAction::Reset).await?;
    Ok(StatusCode::NO_CONTENT)
}
