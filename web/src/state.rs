//! Application state for Axum handlers.

use ezratask_core::environment::Clock;
use ezratask_runtime::TodoStore;
use ezratask_runtime::metrics::MetricsRecorder;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloning is cheap; every clone points at the same store.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The authoritative todo store
    pub store: Arc<TodoStore>,
    /// Prometheus recorder rendered on `/metrics`
    pub metrics: MetricsRecorder,
}

impl AppState {
    /// Create state around an existing store.
    #[must_use]
    pub const fn new(store: Arc<TodoStore>, metrics: MetricsRecorder) -> Self {
        Self { store, metrics }
    }

    /// Fresh, empty store stamped by `clock`, with metrics disabled.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::new(Arc::new(TodoStore::new(clock)), MetricsRecorder::disabled())
    }
}
