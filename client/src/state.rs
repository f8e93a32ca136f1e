//! The observable local mirror of the todo list.
//!
//! [`TodoClientState`] keeps the todos it last fetched, plus loading and
//! error flags, in a [`tokio::sync::watch`] channel. Every change to the
//! mirror is published, so a renderer holding a [`subscribe`] receiver sees
//! each mutation as soon as it happens.
//!
//! [`subscribe`]: TodoClientState::subscribe

use crate::api::TodoApi;
use crate::error::ClientError;
use ezratask_core::{NewTodo, PageRequest, TodoDto, TodoId};
use tokio::sync::watch;

/// Snapshot of the client mirror.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoView {
    /// Todos in display order, newest first
    pub todos: Vec<TodoDto>,
    /// Whether a fetch is in flight
    pub is_loading: bool,
    /// Message of the most recent failure, if any
    pub error: Option<String>,
}

impl TodoView {
    /// The mirrored todo with `id`, if present.
    #[must_use]
    pub fn find(&self, id: TodoId) -> Option<&TodoDto> {
        self.todos.iter().find(|t| t.id == id)
    }
}

/// How [`TodoClientState::add_todo`] brings a new todo into the mirror.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AddStrategy {
    /// Insert the created record at the front without another request.
    #[default]
    Prepend,
    /// Refetch the active listing after creating.
    Refetch,
}

/// Local mirror of the todo list, kept in sync through a [`TodoApi`].
#[derive(Debug)]
pub struct TodoClientState<A> {
    api: A,
    view: watch::Sender<TodoView>,
    strategy: AddStrategy,
}

impl<A: TodoApi> TodoClientState<A> {
    /// Empty mirror backed by `api`, adding with [`AddStrategy::Prepend`].
    #[must_use]
    pub fn new(api: A) -> Self {
        Self::with_strategy(api, AddStrategy::default())
    }

    /// Empty mirror backed by `api`, adding with `strategy`.
    #[must_use]
    pub fn with_strategy(api: A, strategy: AddStrategy) -> Self {
        let (view, _) = watch::channel(TodoView::default());
        Self {
            api,
            view,
            strategy,
        }
    }

    /// Receiver that observes every mirror change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TodoView> {
        self.view.subscribe()
    }

    /// Current snapshot.
    #[must_use]
    pub fn view(&self) -> TodoView {
        self.view.borrow().clone()
    }

    /// The API this mirror talks to.
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Replace the mirror with the first page of active or archived todos.
    ///
    /// Sets `is_loading` for the duration and clears any previous error.
    ///
    /// # Errors
    ///
    /// Returns the API failure after recording its message in the view.
    pub async fn fetch_todos(&self, archived: bool) -> Result<(), ClientError> {
        let request = if archived {
            PageRequest::archived()
        } else {
            PageRequest::active()
        };
        self.fetch_page(request).await
    }

    /// Replace the mirror with an arbitrary page.
    ///
    /// # Errors
    ///
    /// Returns the API failure after recording its message in the view.
    pub async fn fetch_page(&self, request: PageRequest) -> Result<(), ClientError> {
        self.view.send_modify(|view| {
            view.is_loading = true;
            view.error = None;
        });

        let result = self.api.list(request).await;

        self.view.send_modify(|view| {
            view.is_loading = false;
            match &result {
                Ok(page) => view.todos.clone_from(&page.items),
                Err(err) => view.error = Some(err.to_string()),
            }
        });

        match result {
            Ok(page) => {
                tracing::debug!(count = page.items.len(), total = page.total_count, "Fetched todos");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Fetching todos failed");
                Err(err)
            }
        }
    }

    /// Create a todo and bring it into the mirror.
    ///
    /// # Errors
    ///
    /// Returns the API failure after recording its message in the view. A
    /// failed refetch under [`AddStrategy::Refetch`] is reported the same way,
    /// although the todo was created.
    pub async fn add_todo(&self, todo: NewTodo) -> Result<TodoDto, ClientError> {
        self.view.send_modify(|view| view.error = None);

        let created = match self.api.create(&todo).await {
            Ok(created) => created,
            Err(err) => return Err(self.record_error(err, "Adding todo failed")),
        };

        match self.strategy {
            AddStrategy::Prepend => {
                self.view
                    .send_modify(|view| view.todos.insert(0, created.clone()));
            }
            AddStrategy::Refetch => self.fetch_todos(false).await?,
        }

        tracing::debug!(todo_id = %created.id, "Todo added");
        Ok(created)
    }

    /// Flip completion of a mirrored todo and merge the response in place.
    ///
    /// Ids that are not mirrored are ignored and yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns the API failure after recording its message in the view.
    pub async fn toggle_completion(&self, id: TodoId) -> Result<Option<TodoDto>, ClientError> {
        if self.view.borrow().find(id).is_none() {
            tracing::debug!(todo_id = %id, "Toggle for todo outside the mirror ignored");
            return Ok(None);
        }

        let updated = match self.api.toggle_completion(id).await {
            Ok(updated) => updated,
            Err(err) => return Err(self.record_error(err, "Toggling todo failed")),
        };

        self.view.send_modify(|view| {
            if let Some(todo) = view.todos.iter_mut().find(|t| t.id == id) {
                todo.clone_from(&updated);
            }
        });
        Ok(Some(updated))
    }

    /// Archive a todo and drop it from the mirror.
    ///
    /// # Errors
    ///
    /// Returns the API failure after recording its message in the view.
    pub async fn archive(&self, id: TodoId) -> Result<(), ClientError> {
        if let Err(err) = self.api.archive(id).await {
            return Err(self.record_error(err, "Archiving todo failed"));
        }

        self.view.send_modify(|view| view.todos.retain(|t| t.id != id));
        Ok(())
    }

    fn record_error(&self, err: ClientError, context: &'static str) -> ClientError {
        tracing::warn!(error = %err, "{context}");
        self.view
            .send_modify(|view| view.error = Some(err.to_string()));
        err
    }
}
