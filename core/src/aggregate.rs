//! The todo aggregate: state, actions and the reducer that applies them.
//!
//! [`TodoState`] holds every todo plus the last identifier handed out. All
//! mutations go through [`TodoReducer`]; identifiers are assigned inside the
//! reduction, so whoever serializes access to the state also serializes id
//! assignment.

use crate::environment::Clock;
use crate::error::ValidationError;
use crate::pagination::{Page, ValidPage};
use crate::reducer::Reducer;
use crate::todo::{NewTodo, Todo, TodoId};
use crate::validation::validate_new_todo;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Every todo, archived included, keyed by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoState {
    todos: HashMap<TodoId, Todo>,
    last_id: u64,
}

impl TodoState {
    /// Empty state; the first todo gets id 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The todo with `id`, if any.
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.get(&id)
    }

    /// Number of todos, archived included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.todos.len()
    }

    /// Whether no todos exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Number of archived todos.
    #[must_use]
    pub fn archived_count(&self) -> usize {
        self.todos.values().filter(|t| t.is_archived()).count()
    }

    /// The most recently assigned id value, `0` before the first create.
    #[must_use]
    pub const fn last_id(&self) -> u64 {
        self.last_id
    }

    /// One page of active or archived todos, newest first.
    ///
    /// Equal creation times fall back to the higher id first, so the order is
    /// stable across calls.
    #[must_use]
    pub fn page(&self, page: &ValidPage) -> Page<Todo> {
        let mut matching: Vec<&Todo> = self
            .todos
            .values()
            .filter(|t| t.is_archived() == page.is_archived)
            .collect();
        matching.sort_unstable_by_key(|t| (Reverse(t.creation_time), Reverse(t.id)));

        let total_count = matching.len();
        let items = matching
            .into_iter()
            .skip(page.offset())
            .take(page.limit())
            .cloned()
            .collect();

        Page {
            items,
            total_count,
            page_number: page.page_number,
            page_size: page.page_size,
        }
    }

    fn next_id(&mut self) -> TodoId {
        self.last_id += 1;
        TodoId::new(self.last_id)
    }
}

/// Requests to change the todo list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TodoAction {
    /// Validate, sanitize and store a new todo
    Create(NewTodo),
    /// Flip a todo between open and completed
    ToggleCompletion(TodoId),
    /// Hide a todo from the default listing
    Archive(TodoId),
    /// Drop every todo and restart ids at 1
    Reset,
}

impl TodoAction {
    /// Operation name used in logs and metric labels.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::ToggleCompletion(_) => "toggle_completion",
            Self::Archive(_) => "archive",
            Self::Reset => "reset",
        }
    }
}

/// What an accepted action did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TodoEvent {
    /// A todo was stored
    Created(Todo),
    /// A todo's completion flipped
    CompletionToggled(Todo),
    /// A todo was archived; `first` is false when it already was
    Archived {
        /// The todo after archiving
        todo: Todo,
        /// Whether this call set the archive timestamp
        first: bool,
    },
    /// The list was cleared
    Reset {
        /// How many todos were dropped
        removed: usize,
    },
}

impl TodoEvent {
    /// The todo this event touched, if it touched exactly one.
    #[must_use]
    pub const fn todo(&self) -> Option<&Todo> {
        match self {
            Self::Created(todo) | Self::CompletionToggled(todo) | Self::Archived { todo, .. } => {
                Some(todo)
            }
            Self::Reset { .. } => None,
        }
    }
}

/// Why an action was refused. State is unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TodoRejection {
    /// The create request failed validation
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// No todo has this id
    #[error("Todo with id {0} not found")]
    NotFound(TodoId),
}

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Clock for generating timestamps
    pub clock: Arc<dyn Clock>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the todo aggregate
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;
    type Output = Result<TodoEvent, TodoRejection>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Self::Output {
        match action {
            TodoAction::Create(request) => {
                let valid = validate_new_todo(&request)?;
                let id = state.next_id();
                let todo = Todo::new(id, valid, env.clock.now());
                state.todos.insert(id, todo.clone());
                Ok(TodoEvent::Created(todo))
            }

            TodoAction::ToggleCompletion(id) => {
                let todo = state
                    .todos
                    .get_mut(&id)
                    .ok_or(TodoRejection::NotFound(id))?;
                todo.toggle_completion(env.clock.now());
                Ok(TodoEvent::CompletionToggled(todo.clone()))
            }

            TodoAction::Archive(id) => {
                let todo = state
                    .todos
                    .get_mut(&id)
                    .ok_or(TodoRejection::NotFound(id))?;
                let first = todo.archive(env.clock.now());
                Ok(TodoEvent::Archived {
                    todo: todo.clone(),
                    first,
                })
            }

            TodoAction::Reset => {
                let removed = state.todos.len();
                state.todos.clear();
                state.last_id = 0;
                Ok(TodoEvent::Reset { removed })
            }
        }
    }
}
