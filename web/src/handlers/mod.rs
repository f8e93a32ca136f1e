//! HTTP request handlers.

pub mod admin;
pub mod health;
pub mod todos;

pub use health::{health_check, readiness_check};
