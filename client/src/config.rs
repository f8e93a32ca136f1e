//! Client configuration.

use std::env;

/// Base URL used when `EZRATASK_API_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Where the todo API lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme, host and port, without a trailing slash
    pub base_url: String,
}

impl ClientConfig {
    /// Configuration for the API at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Read `EZRATASK_API_BASE_URL`, falling back to [`DEFAULT_BASE_URL`].
    #[must_use]
    pub fn from_env() -> Self {
        env::var("EZRATASK_API_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map_or_else(Self::default, Self::new)
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
