//! Axum HTTP API for the EzraTask todo service.
//!
//! This crate is the imperative shell around [`ezratask_runtime::TodoStore`]:
//! it parses requests, hands validated input to the store, and maps results
//! and errors onto HTTP responses.
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at an Axum handler
//! 2. **Extract data** (JSON body, query string, path id)
//! 3. **Validate** into domain input, collecting every field error
//! 4. **Call the store** (`list`, `create`, `get`, `toggle_completion`, `archive`)
//! 5. **Map result** to a `TodoDto` response or an [`AppError`]
//!
//! # Example
//!
//! ```ignore
//! use ezratask_web::{AppState, Config, build_router};
//!
//! let config = Config::from_env()?;
//! let state = AppState::with_clock(Arc::new(SystemClock));
//! let app = build_router(state, &config.api);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;
pub mod state;

// Re-export key types for convenience
pub use config::{ApiConfig, Config, ConfigError, ServerConfig};
pub use error::AppError;
pub use extractors::CorrelationId;
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};
pub use router::{RESET_PATH, build_router};
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
