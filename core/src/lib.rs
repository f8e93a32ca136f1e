//! # EzraTask Core
//!
//! Domain types and rules for the EzraTask todo service.
//!
//! This crate has no I/O. It defines:
//!
//! - **Todo**: the task record and its wire representation ([`todo::TodoDto`])
//! - **Validation**: description length rules and markup stripping
//! - **Pagination**: page requests and paged responses
//! - **Environment**: the [`environment::Clock`] abstraction used for timestamps
//! - **Reducer**: the [`reducer::Reducer`] trait and the todo aggregate
//!   ([`aggregate::TodoReducer`]) that every store mutation runs through
//!
//! ## Example
//!
//! ```
//! use ezratask_core::todo::{NewTodo, Priority};
//! use ezratask_core::validation::validate_new_todo;
//!
//! let request = NewTodo::new("  <b>Buy</b> milk  ").with_priority(Priority::High);
//! let valid = validate_new_todo(&request).unwrap();
//! assert_eq!(valid.description, "Buy milk");
//! ```

pub mod aggregate;
pub mod environment;
pub mod error;
pub mod pagination;
pub mod reducer;
pub mod todo;
pub mod validation;

pub use chrono::{DateTime, Utc};

pub use aggregate::{
    TodoAction, TodoEnvironment, TodoEvent, TodoReducer, TodoRejection, TodoState,
};
pub use environment::{Clock, SystemClock};
pub use error::ValidationError;
pub use pagination::{Page, PageRequest};
pub use reducer::Reducer;
pub use todo::{NewTodo, Priority, Todo, TodoDto, TodoId};
