//! # EzraTask Client
//!
//! HTTP client for the EzraTask todo API and an observable local mirror of
//! the todo list.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ezratask_client::{HttpTodoApi, TodoClientState};
//! use ezratask_core::NewTodo;
//!
//! # async fn example() -> Result<(), ezratask_client::ClientError> {
//! let state = TodoClientState::new(HttpTodoApi::from_env());
//! let mut updates = state.subscribe();
//!
//! state.fetch_todos(false).await?;
//! state.add_todo(NewTodo::new("Buy milk")).await?;
//!
//! println!("{} todos", updates.borrow_and_update().todos.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]

pub mod api;
pub mod config;
pub mod error;
pub mod state;

pub use api::{HttpTodoApi, TodoApi};
pub use config::ClientConfig;
pub use error::ClientError;
pub use state::{AddStrategy, TodoClientState, TodoView};
