//! # EzraTask Runtime
//!
//! The authoritative in-memory todo store.
//!
//! ## Core Components
//!
//! - **`TodoStore`**: runs [`TodoAction`]s through the todo reducer under a
//!   write lock and serves reads under a read lock
//! - **Health**: readiness reporting, unhealthy when the state lock is stuck
//! - **Metrics**: Prometheus counters for store operations
//!
//! ## Example
//!
//! ```
//! use ezratask_core::{NewTodo, PageRequest, SystemClock, TodoAction, TodoEvent};
//! use ezratask_runtime::TodoStore;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let store = TodoStore::new(Arc::new(SystemClock));
//! let Ok(TodoEvent::Created(todo)) = store.send(TodoAction::Create(NewTodo::new("Buy milk"))).await
//! else {
//!     panic!("create failed");
//! };
//!
//! store.send(TodoAction::ToggleCompletion(todo.id)).await.unwrap();
//!
//! let page = store.list(PageRequest::active()).await.unwrap();
//! assert_eq!(page.total_count, 1);
//! assert!(page.items[0].is_completed());
//! # });
//! ```

pub mod health;
pub mod metrics;
pub mod store;

pub use health::{HealthCheck, HealthStatus};
pub use ezratask_core::aggregate::{TodoAction, TodoEvent, TodoRejection};
pub use store::TodoStore;
