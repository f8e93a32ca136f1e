//! Prometheus metrics for the todo store.
//!
//! Store operations record counters through the `metrics` facade. Nothing is
//! exported until a recorder is installed with [`MetricsRecorder::install`];
//! the web crate renders the installed recorder on `GET /metrics`.
//!
//! # Example
//!
//! ```rust,no_run
//! use ezratask_runtime::metrics::MetricsRecorder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let recorder = MetricsRecorder::install()?;
//! if let Some(text) = recorder.render() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use thiserror::Error;

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Installed Prometheus recorder.
#[derive(Clone)]
pub struct MetricsRecorder {
    handle: Option<PrometheusHandle>,
}

impl MetricsRecorder {
    /// Install the global Prometheus recorder and describe the store metrics.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::Install`] if the recorder cannot be installed for
    /// a reason other than one already being present.
    ///
    /// # Note
    ///
    /// If a recorder is already installed (e.g., in tests), this logs a warning
    /// and returns a recorder whose [`render`](Self::render) yields `None`.
    pub fn install() -> Result<Self, MetricsError> {
        match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                register_metrics();
                tracing::info!("Prometheus metrics recorder installed");
                Ok(Self {
                    handle: Some(handle),
                })
            }
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(Self { handle: None })
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            }
        }
    }

    /// A recorder that renders nothing, for when metrics are disabled.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { handle: None }
    }

    /// Render current metrics in Prometheus text format.
    ///
    /// Returns `None` if this recorder does not own the installed exporter.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

impl std::fmt::Debug for MetricsRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsRecorder")
            .field("installed", &self.handle.is_some())
            .finish()
    }
}

/// Register all metric descriptions.
fn register_metrics() {
    describe_counter!("todo_store_created_total", "Todos created");
    describe_counter!(
        "todo_store_validation_failures_total",
        "Create requests rejected by validation"
    );
    describe_counter!("todo_store_toggled_total", "Completion toggles applied");
    describe_counter!("todo_store_archived_total", "Archive requests applied");
    describe_counter!(
        "todo_store_not_found_total",
        "Operations addressed to an unknown todo"
    );
    describe_counter!("todo_store_resets_total", "Store resets");
    describe_gauge!("todo_store_todos", "Todos currently held, archived included");
}

/// Todo store metrics recorder.
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record a created todo and the new store size.
    #[allow(clippy::cast_precision_loss)] // store sizes stay far below 2^52
    pub fn record_created(size: usize) {
        counter!("todo_store_created_total").increment(1);
        gauge!("todo_store_todos").set(size as f64);
    }

    /// Record a create rejected by validation.
    pub fn record_validation_failure() {
        counter!("todo_store_validation_failures_total").increment(1);
    }

    /// Record a completion toggle.
    pub fn record_toggled() {
        counter!("todo_store_toggled_total").increment(1);
    }

    /// Record an archive.
    pub fn record_archived() {
        counter!("todo_store_archived_total").increment(1);
    }

    /// Record a lookup for an unknown id.
    pub fn record_not_found(operation: &'static str) {
        counter!("todo_store_not_found_total", "operation" => operation).increment(1);
    }

    /// Record a reset.
    pub fn record_reset() {
        counter!("todo_store_resets_total").increment(1);
        gauge!("todo_store_todos").set(0.0);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_recorder_renders_nothing() {
        assert!(MetricsRecorder::disabled().render().is_none());
    }

    #[test]
    fn test_install_and_render() {
        let recorder = MetricsRecorder::install().unwrap();

        StoreMetrics::record_created(1);
        StoreMetrics::record_not_found("archive");

        // Another test may have installed the recorder first; metrics are
        // still recorded, only this handle cannot render them.
        if let Some(rendered) = recorder.render() {
            assert!(rendered.contains("todo_store_created_total"));
            assert!(rendered.contains("todo_store_not_found_total"));
        }
    }
}
