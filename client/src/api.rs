//! The todo API seam and its reqwest implementation.

use crate::config::ClientConfig;
use crate::error::{ClientError, ErrorBody};
use ezratask_core::{NewTodo, Page, PageRequest, TodoDto, TodoId};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::future::Future;

/// Path of the todo resource.
pub const TODOS_PATH: &str = "/api/v1/todos";

/// Operations the client state needs from the todo API.
///
/// [`HttpTodoApi`] talks HTTP; tests substitute in-memory fakes.
pub trait TodoApi: Send + Sync {
    /// Fetch one page of todos.
    fn list(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = Result<Page<TodoDto>, ClientError>> + Send;

    /// Create a todo and return the stored record.
    fn create(&self, todo: &NewTodo) -> impl Future<Output = Result<TodoDto, ClientError>> + Send;

    /// Fetch one todo.
    fn get(&self, id: TodoId) -> impl Future<Output = Result<TodoDto, ClientError>> + Send;

    /// Flip completion and return the updated record.
    fn toggle_completion(
        &self,
        id: TodoId,
    ) -> impl Future<Output = Result<TodoDto, ClientError>> + Send;

    /// Archive a todo.
    fn archive(&self, id: TodoId) -> impl Future<Output = Result<(), ClientError>> + Send;
}

/// Todo API client over HTTP
#[derive(Clone, Debug)]
pub struct HttpTodoApi {
    client: Client,
    config: ClientConfig,
}

impl HttpTodoApi {
    /// Create a client for the API described by `config`
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create a client reusing an existing reqwest [`Client`]
    #[must_use]
    pub const fn with_client(client: Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    /// Create a client configured from `EZRATASK_API_BASE_URL`
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env())
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn todo_url(&self, id: TodoId, action: Option<&str>) -> String {
        match action {
            Some(action) => self.config.url(&format!("{TODOS_PATH}/{id}/{action}")),
            None => self.config.url(&format!("{TODOS_PATH}/{id}")),
        }
    }
}

impl TodoApi for HttpTodoApi {
    async fn list(&self, request: PageRequest) -> Result<Page<TodoDto>, ClientError> {
        let url = self.config.url(TODOS_PATH);
        tracing::debug!(%url, page = request.page_number, archived = request.is_archived, "GET todos");

        let response = self
            .client
            .get(url)
            .query(&request)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        read_json(response).await
    }

    async fn create(&self, todo: &NewTodo) -> Result<TodoDto, ClientError> {
        let url = self.config.url(TODOS_PATH);
        tracing::debug!(%url, "POST todo");

        let response = self
            .client
            .post(url)
            .json(todo)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        read_json(response).await
    }

    async fn get(&self, id: TodoId) -> Result<TodoDto, ClientError> {
        let url = self.todo_url(id, None);
        tracing::debug!(%url, "GET todo");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        read_json(response).await
    }

    async fn toggle_completion(&self, id: TodoId) -> Result<TodoDto, ClientError> {
        let url = self.todo_url(id, Some("toggle-completion"));
        tracing::debug!(%url, "PATCH toggle-completion");

        let response = self
            .client
            .patch(url)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        read_json(response).await
    }

    async fn archive(&self, id: TodoId) -> Result<(), ClientError> {
        let url = self.todo_url(id, Some("archive"));
        tracing::debug!(%url, "PATCH archive");

        let response = self
            .client
            .patch(url)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        check_status(response).await.map(drop)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    check_status(response)
        .await?
        .json::<T>()
        .await
        .map_err(|e| ClientError::ResponseParseFailed(e.to_string()))
}

/// Pass successful responses through; map everything else to a [`ClientError`].
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), %body, "API error response");
    let parsed = serde_json::from_str::<ErrorBody>(&body).ok();

    Err(match (status, parsed) {
        (StatusCode::NOT_FOUND, parsed) => {
            ClientError::NotFound(parsed.map_or(body, |b| b.message))
        }
        (StatusCode::BAD_REQUEST, Some(parsed)) => ClientError::Validation {
            message: parsed.message,
            errors: parsed.errors,
        },
        (status, parsed) => ClientError::Api {
            status: status.as_u16(),
            message: parsed.map_or(body, |b| b.message),
        },
    })
}
