//! Store health reporting for readiness checks.
//!
//! The store is unhealthy when its state lock cannot be taken for reading
//! within the check timeout, which means some mutation is stuck holding it.

use serde::Serialize;

/// Readiness of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    /// Serving requests
    Healthy,
    /// Not serving requests
    Unhealthy,
}

impl HealthStatus {
    /// Whether the component can serve requests.
    #[must_use]
    pub const fn is_healthy(self) -> bool {
        matches!(self, Self::Healthy)
    }
}

/// One component's readiness, with counters attached when healthy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    /// Component name
    pub component: &'static str,
    /// Readiness
    pub status: HealthStatus,
    /// Why the component is unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Key/value details, such as todo counts
    pub metadata: Vec<(String, String)>,
}

impl HealthCheck {
    /// A healthy result for `component`.
    #[must_use]
    pub const fn healthy(component: &'static str) -> Self {
        Self {
            component,
            status: HealthStatus::Healthy,
            message: None,
            metadata: Vec::new(),
        }
    }

    /// An unhealthy result for `component`, explained by `message`.
    #[must_use]
    pub fn unhealthy(component: &'static str, message: impl Into<String>) -> Self {
        Self {
            component,
            status: HealthStatus::Unhealthy,
            message: Some(message.into()),
            metadata: Vec::new(),
        }
    }

    /// Attach a detail.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.metadata.push((key.into(), value.to_string()));
        self
    }

    /// Value of the detail named `key`.
    #[must_use]
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
