//! The todo store.
//!
//! [`TodoStore`] owns a [`TodoState`] behind a [`tokio::sync::RwLock`] and
//! runs every mutation through the [`TodoReducer`] while holding the write
//! lock. Ids are assigned inside the reduction, so concurrent creates and
//! resets can never hand out the same id twice. Reads take the read lock and
//! never block each other.

use crate::health::HealthCheck;
use crate::metrics::StoreMetrics;
use ezratask_core::aggregate::{
    TodoAction, TodoEnvironment, TodoEvent, TodoReducer, TodoRejection, TodoState,
};
use ezratask_core::environment::Clock;
use ezratask_core::pagination::{Page, PageRequest};
use ezratask_core::reducer::Reducer;
use ezratask_core::todo::{Todo, TodoId};
use ezratask_core::ValidationError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Component name reported by [`TodoStore::health`].
pub const HEALTH_COMPONENT: &str = "todo_store";

/// How long a readiness check waits for the state lock.
pub const HEALTH_LOCK_TIMEOUT: Duration = Duration::from_millis(500);

/// In-memory store of todos.
///
/// Todos are never removed except by [`TodoAction::Reset`]; archiving only
/// hides them from the default listing.
pub struct TodoStore {
    state: RwLock<TodoState>,
    reducer: TodoReducer,
    environment: TodoEnvironment,
}

impl TodoStore {
    /// Create an empty store stamping records with `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_environment(TodoEnvironment::new(clock))
    }

    /// Create an empty store around an existing environment.
    #[must_use]
    pub fn with_environment(environment: TodoEnvironment) -> Self {
        Self {
            state: RwLock::new(TodoState::new()),
            reducer: TodoReducer::new(),
            environment,
        }
    }

    /// Apply an action.
    ///
    /// The reduction runs under the write lock; metrics and logging happen
    /// after it is released.
    ///
    /// # Errors
    ///
    /// Returns [`TodoRejection::Invalid`] for a create that fails validation
    /// and [`TodoRejection::NotFound`] for an unknown id. State is unchanged
    /// in both cases.
    pub async fn send(&self, action: TodoAction) -> Result<TodoEvent, TodoRejection> {
        let operation = action.name();
        let (result, size) = {
            let mut state = self.state.write().await;
            let result = self.reducer.reduce(&mut state, action, &self.environment);
            (result, state.len())
        };

        match &result {
            Ok(event) => Self::observe(event, size),
            Err(TodoRejection::Invalid(err)) => {
                StoreMetrics::record_validation_failure();
                tracing::debug!(error = %err, "Rejected todo");
            }
            Err(TodoRejection::NotFound(id)) => {
                StoreMetrics::record_not_found(operation);
                tracing::debug!(todo_id = %id, operation, "Unknown todo");
            }
        }
        result
    }

    fn observe(event: &TodoEvent, size: usize) {
        match event {
            TodoEvent::Created(todo) => {
                StoreMetrics::record_created(size);
                tracing::info!(todo_id = %todo.id, priority = %todo.priority, "Todo created");
            }
            TodoEvent::CompletionToggled(todo) => {
                StoreMetrics::record_toggled();
                tracing::info!(
                    todo_id = %todo.id,
                    completed = todo.is_completed(),
                    row_version = todo.row_version,
                    "Todo completion toggled"
                );
            }
            TodoEvent::Archived { todo, first } => {
                StoreMetrics::record_archived();
                tracing::info!(todo_id = %todo.id, first, "Todo archived");
            }
            TodoEvent::Reset { removed } => {
                StoreMetrics::record_reset();
                tracing::warn!(removed, "Todo store reset");
            }
        }
    }

    /// Read current state via a closure.
    ///
    /// ```ignore
    /// let archived = store.state(|s| s.archived_count()).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&TodoState) -> T,
    {
        let state = self.state.read().await;
        f(&*state)
    }

    /// List one page of active or archived todos, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the paging values are out of range.
    pub async fn list(&self, request: PageRequest) -> Result<Page<Todo>, ValidationError> {
        let page = request.validate()?;
        Ok(self.state(|s| s.page(&page)).await)
    }

    /// Fetch a todo by id.
    pub async fn get(&self, id: TodoId) -> Option<Todo> {
        self.state(|s| s.get(id).cloned()).await
    }

    /// Number of stored todos, archived included.
    pub async fn len(&self) -> usize {
        self.state(TodoState::len).await
    }

    /// Whether the store holds no todos.
    pub async fn is_empty(&self) -> bool {
        self.state(TodoState::is_empty).await
    }

    /// Report store health, waiting at most [`HEALTH_LOCK_TIMEOUT`].
    pub async fn health(&self) -> HealthCheck {
        self.health_within(HEALTH_LOCK_TIMEOUT).await
    }

    /// Report store health, waiting at most `timeout` for the state lock.
    ///
    /// Healthy results carry the todo counts and the last assigned id.
    pub async fn health_within(&self, timeout: Duration) -> HealthCheck {
        let Ok(state) = tokio::time::timeout(timeout, self.state.read()).await else {
            tracing::warn!(?timeout, "Store lock unavailable");
            return HealthCheck::unhealthy(
                HEALTH_COMPONENT,
                format!("state lock not acquired within {} ms", timeout.as_millis()),
            );
        };

        HealthCheck::healthy(HEALTH_COMPONENT)
            .with_metadata("todos", state.len())
            .with_metadata("archived", state.archived_count())
            .with_metadata("last_id", state.last_id())
    }
}

impl std::fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStore")
            .field("reducer", &self.reducer)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}
