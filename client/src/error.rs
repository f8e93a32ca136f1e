//! Error types for the EzraTask API client

use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur when talking to the todo API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body could not be decoded
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// The addressed todo does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The API rejected the input
    #[error("{message}")]
    Validation {
        /// Summary message from the API
        message: String,
        /// Field name to messages
        errors: BTreeMap<String, Vec<String>>,
    },

    /// API returned any other error
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API, or the raw body
        message: String,
    },
}

impl ClientError {
    /// Messages reported for `field`, empty unless this is a validation error.
    #[must_use]
    pub fn field_errors(&self, field: &str) -> &[String] {
        match self {
            Self::Validation { errors, .. } => errors.get(field).map_or(&[], Vec::as_slice),
            _ => &[],
        }
    }
}

/// Error body rendered by the API.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) message: String,
    #[serde(default)]
    pub(crate) errors: BTreeMap<String, Vec<String>>,
}
