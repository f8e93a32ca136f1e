//! Todo API endpoints.
//!
//! - `GET    /api/v1/todos` - list one page of active or archived todos
//! - `POST   /api/v1/todos` - create a todo
//! - `GET    /api/v1/todos/:id` - fetch one todo
//! - `PATCH  /api/v1/todos/:id/toggle-completion` - flip completion
//! - `PATCH  /api/v1/todos/:id/archive` - archive (soft delete)

use crate::extractors::{TodoIdPath, ValidJson, ValidQuery};
use crate::state::AppState;
use crate::{AppError, WebResult};
use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
};
use ezratask_core::todo::CreateTodoRequest;
use ezratask_core::{Page, PageRequest, TodoAction, TodoDto, TodoEvent};

/// Route prefix for the todo resource.
pub const TODOS_PATH: &str = "/api/v1/todos";

/// List todos with pagination.
///
/// # Example
///
/// ```bash
/// curl "http://localhost:8080/api/v1/todos?pageNumber=1&pageSize=25&isArchived=false"
/// ```
pub async fn list_todos(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<PageRequest>,
) -> WebResult<Json<Page<TodoDto>>> {
    let page = state.store.list(query).await?;
    tracing::debug!(
        total = page.total_count,
        returned = page.items.len(),
        archived = query.is_archived,
        "Listed todos"
    );
    Ok(Json(page.map(TodoDto::from)))
}

/// Create a todo.
///
/// Responds `201 Created` with the new todo and a `Location` header.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/v1/todos \
///   -H "Content-Type: application/json" \
///   -d '{"description": "Buy milk", "priority": "High"}'
/// ```
pub async fn create_todo(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CreateTodoRequest>,
) -> WebResult<(StatusCode, [(header::HeaderName, String); 1], Json<TodoDto>)> {
    let new_todo = request.into_new_todo()?;

    match state.store.send(TodoAction::Create(new_todo)).await? {
        TodoEvent::Created(todo) => Ok((
            StatusCode::CREATED,
            [(header::LOCATION, format!("{TODOS_PATH}/{}", todo.id))],
            Json(TodoDto::from(todo)),
        )),
        _ => Err(AppError::internal("Unexpected store event")),
    }
}

/// Get one todo by id.
pub async fn get_todo(
    State(state): State<AppState>,
    TodoIdPath(id): TodoIdPath,
) -> WebResult<Json<TodoDto>> {
    let todo = state
        .store
        .get(id)
        .await
        .ok_or_else(|| AppError::not_found("Todo", id))?;
    Ok(Json(TodoDto::from(todo)))
}

/// Flip a todo between open and completed.
pub async fn toggle_completion(
    State(state): State<AppState>,
    TodoIdPath(id): TodoIdPath,
) -> WebResult<Json<TodoDto>> {
    match state.store.send(TodoAction::ToggleCompletion(id)).await? {
        TodoEvent::CompletionToggled(todo) => Ok(Json(TodoDto::from(todo))),
        _ => Err(AppError::internal("Unexpected store event")),
    }
}

/// Archive a todo. Responds `204 No Content`.
pub async fn archive_todo(
    State(state): State<AppState>,
    TodoIdPath(id): TodoIdPath,
) -> WebResult<StatusCode> {
    state.store.send(TodoAction::Archive(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
