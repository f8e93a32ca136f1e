//! End-to-end tests of the todo HTTP API, driven through the full router.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::Duration;
use ezratask_core::validation::messages;
use ezratask_core::{Page, TodoDto};
use ezratask_testing::helpers::description_of_len;
use ezratask_testing::{SteppingClock, epoch};
use ezratask_web::{ApiConfig, AppState, RESET_PATH, build_router};
use serde_json::{Value, json};
use std::sync::Arc;

const TODOS: &str = "/api/v1/todos";

fn server_with(api: &ApiConfig) -> TestServer {
    let clock = SteppingClock::new(epoch(), Duration::seconds(1));
    let state = AppState::with_clock(Arc::new(clock));
    TestServer::new(build_router(state, api)).unwrap()
}

fn server() -> TestServer {
    server_with(&ApiConfig {
        enable_test_endpoints: true,
        ..ApiConfig::default()
    })
}

async fn create(server: &TestServer, description: &str) -> TodoDto {
    let response = server
        .post(TODOS)
        .json(&json!({ "description": description }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<TodoDto>()
}

async fn list(server: &TestServer, archived: bool) -> Page<TodoDto> {
    let response = server
        .get(TODOS)
        .add_query_param("isArchived", archived)
        .await;
    response.assert_status_ok();
    response.json::<Page<TodoDto>>()
}

fn field_errors(body: &Value, field: &str) -> Vec<String> {
    body["errors"][field]
        .as_array()
        .map(|messages| {
            messages
                .iter()
                .filter_map(|m| m.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn health_reports_ok() {
    let server = server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "status": "OK" }));
}

#[tokio::test]
async fn readiness_reports_store_health() {
    let server = server();

    let response = server.get("/health/ready").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["component"], "todo_store");
    assert_eq!(body["status"], "Healthy");
}

#[tokio::test]
async fn create_returns_created_todo_with_location() {
    let server = server();

    let response = server
        .post(TODOS)
        .json(&json!({ "description": "Buy milk", "priority": "High" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.header("location"), "/api/v1/todos/1");

    let body = response.json::<Value>();
    assert_eq!(body["id"], "1");
    assert_eq!(body["description"], "Buy milk");
    assert_eq!(body["isCompleted"], false);
    assert_eq!(body["completedAt"], Value::Null);
    assert_eq!(body["priority"], "High");
    assert_eq!(body["rowVersion"], "1");
}

#[tokio::test]
async fn create_accepts_priority_ordinals_and_any_case() {
    let server = server();

    let by_ordinal = server
        .post(TODOS)
        .json(&json!({ "description": "ordinal", "priority": 2 }))
        .await;
    by_ordinal.assert_status(StatusCode::CREATED);
    assert_eq!(by_ordinal.json::<Value>()["priority"], "Medium");

    let lower = server
        .post(TODOS)
        .json(&json!({ "description": "lowercase", "priority": "low" }))
        .await;
    lower.assert_status(StatusCode::CREATED);
    assert_eq!(lower.json::<Value>()["priority"], "Low");
}

#[tokio::test]
async fn description_length_boundaries() {
    let server = server();

    for len in [3, 1000] {
        let response = server
            .post(TODOS)
            .json(&json!({ "description": description_of_len(len) }))
            .await;
        response.assert_status(StatusCode::CREATED);
    }

    let cases = [
        (json!({}), messages::DESCRIPTION_REQUIRED),
        (json!({ "description": "   " }), messages::DESCRIPTION_REQUIRED),
        (json!({ "description": "ab" }), messages::DESCRIPTION_MIN_LENGTH),
        (
            json!({ "description": description_of_len(1001) }),
            messages::DESCRIPTION_MAX_LENGTH,
        ),
    ];

    for (request, expected) in cases {
        let response = server.post(TODOS).json(&request).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body = response.json::<Value>();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(field_errors(&body, "description"), [expected]);
    }

    assert_eq!(list(&server, false).await.total_count, 2);
}

#[tokio::test]
async fn create_reports_every_field_error() {
    let server = server();

    let response = server
        .post(TODOS)
        .json(&json!({ "description": "x", "priority": "Urgent" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(
        field_errors(&body, "description"),
        [messages::DESCRIPTION_MIN_LENGTH]
    );
    assert_eq!(field_errors(&body, "priority"), [messages::INVALID_PRIORITY]);
}

#[tokio::test]
async fn create_rejects_malformed_json() {
    let server = server();

    let response = server
        .post(TODOS)
        .content_type("application/json")
        .text("{ not json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn create_strips_markup_from_description() {
    let server = server();

    let todo = create(&server, "<b>Buy</b> milk<script>alert(1)</script>").await;

    assert_eq!(todo.description, "Buy milk");
}

#[tokio::test]
async fn list_returns_newest_first() {
    let server = server();
    for description in ["first", "second", "third"] {
        create(&server, description).await;
    }

    let page = list(&server, false).await;

    let descriptions: Vec<_> = page.items.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(descriptions, ["third", "second", "first"]);
    assert_eq!(page.total_count, 3);
    assert_eq!(page.page_number, 1);
    assert_eq!(page.page_size, 25);
}

#[tokio::test]
async fn list_paginates() {
    let server = server();
    for i in 1..=5 {
        create(&server, &format!("todo {i}")).await;
    }

    let response = server
        .get(TODOS)
        .add_query_param("pageNumber", 2)
        .add_query_param("pageSize", 2)
        .await;

    response.assert_status_ok();
    let page = response.json::<Page<TodoDto>>();
    let descriptions: Vec<_> = page.items.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(descriptions, ["todo 3", "todo 2"]);
    assert_eq!(page.total_count, 5);

    let beyond = server
        .get(TODOS)
        .add_query_param("pageNumber", 9)
        .add_query_param("pageSize", 2)
        .await
        .json::<Page<TodoDto>>();
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total_count, 5);
}

#[tokio::test]
async fn list_rejects_bad_paging() {
    let server = server();

    let response = server
        .get(TODOS)
        .add_query_param("pageNumber", 0)
        .add_query_param("pageSize", 101)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(
        field_errors(&body, "pageNumber"),
        [messages::PAGE_NUMBER_RANGE]
    );
    assert_eq!(field_errors(&body, "pageSize"), [messages::PAGE_SIZE_RANGE]);

    let unparseable = server
        .get(TODOS)
        .add_query_param("pageSize", "lots")
        .await;
    unparseable.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn toggle_twice_restores_open_state() {
    let server = server();
    let todo = create(&server, "Walk the dog").await;
    let path = format!("{TODOS}/{}/toggle-completion", todo.id);

    let completed = server.patch(&path).await;
    completed.assert_status_ok();
    let completed = completed.json::<TodoDto>();
    assert!(completed.is_completed);
    assert!(completed.completed_at.is_some());
    assert_eq!(completed.row_version, 2);

    let reopened = server.patch(&path).await.json::<TodoDto>();
    assert!(!reopened.is_completed);
    assert!(reopened.completed_at.is_none());
    assert_eq!(reopened.row_version, 3);
    assert!(reopened.last_modified_time > completed.last_modified_time);
}

#[tokio::test]
async fn archive_moves_todo_to_archived_listing() {
    let server = server();
    let keep = create(&server, "keep me").await;
    let gone = create(&server, "archive me").await;

    let response = server
        .patch(&format!("{TODOS}/{}/archive", gone.id))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    let active = list(&server, false).await;
    assert_eq!(active.total_count, 1);
    assert_eq!(active.items[0].id, keep.id);

    let archived = list(&server, true).await;
    assert_eq!(archived.total_count, 1);
    assert_eq!(archived.items[0].id, gone.id);
    assert!(archived.items[0].archived_at.is_some());

    // Archived todos remain addressable by id
    let fetched = server
        .get(&format!("{TODOS}/{}", gone.id))
        .await
        .json::<TodoDto>();
    assert_eq!(fetched.archived_at, archived.items[0].archived_at);
}

#[tokio::test]
async fn archive_is_idempotent() {
    let server = server();
    let todo = create(&server, "archive twice").await;
    let path = format!("{TODOS}/{}/archive", todo.id);

    server.patch(&path).await.assert_status(StatusCode::NO_CONTENT);
    let first = server
        .get(&format!("{TODOS}/{}", todo.id))
        .await
        .json::<TodoDto>();

    server.patch(&path).await.assert_status(StatusCode::NO_CONTENT);
    let second = server
        .get(&format!("{TODOS}/{}", todo.id))
        .await
        .json::<TodoDto>();

    assert_eq!(first.archived_at, second.archived_at);
    assert_eq!(list(&server, true).await.total_count, 1);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let server = server();
    create(&server, "only one").await;

    for path in [
        format!("{TODOS}/99"),
        format!("{TODOS}/abc"),
    ] {
        let response = server.get(&path).await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["code"], "NOT_FOUND");
    }

    server
        .patch(&format!("{TODOS}/99/toggle-completion"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .patch(&format!("{TODOS}/99/archive"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn lifecycle_create_toggle_archive() {
    let server = server();

    let todo = create(&server, "Ship the release").await;
    assert_eq!(list(&server, false).await.items, [todo.clone()]);

    let toggled = server
        .patch(&format!("{TODOS}/{}/toggle-completion", todo.id))
        .await
        .json::<TodoDto>();
    assert!(toggled.is_completed);
    assert_eq!(list(&server, false).await.items, [toggled.clone()]);

    server
        .patch(&format!("{TODOS}/{}/archive", todo.id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    assert!(list(&server, false).await.items.is_empty());
    let archived = list(&server, true).await.items;
    assert_eq!(archived.len(), 1);
    assert!(archived[0].is_completed);
}

#[tokio::test]
async fn reset_clears_store_and_restarts_ids() {
    let server = server();
    create(&server, "first").await;
    create(&server, "second").await;

    server.post(RESET_PATH).await.assert_status(StatusCode::NO_CONTENT);

    assert_eq!(list(&server, false).await.total_count, 0);
    let fresh = create(&server, "after reset").await;
    assert_eq!(fresh.id.to_string(), "1");
}

#[tokio::test]
async fn reset_absent_when_test_endpoints_disabled() {
    let server = server_with(&ApiConfig {
        enable_test_endpoints: false,
        ..ApiConfig::default()
    });
    create(&server, "survivor").await;

    server.post(RESET_PATH).await.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(list(&server, false).await.total_count, 1);
}
