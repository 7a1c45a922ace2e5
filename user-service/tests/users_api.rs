//! User collection endpoints driven through the full router
mod common;

use axum::http::{header, Method, StatusCode};
use common::*;
use serde_json::json;
use user_service::config::Config;

#[tokio::test]
async fn test_user_lifecycle() {
    let (app, _) = test_app();

    let alice = create(&app, "Alice", 30).await;
    assert_eq!(alice["id"], 1);
    assert_eq!(alice["name"], "Alice");
    assert_eq!(alice["age"], 30);
    assert!(alice["created_at"].is_string());
    assert!(alice["deleted_at"].is_null());

    let thirty = list(&app, "age=30").await;
    assert_eq!(names(&thirty), vec!["Alice"]);
    assert_eq!(thirty[0], alice);

    let (status, updated) = call(
        &app,
        json_request(Method::PUT, "/api/v1/users/1", &json!({ "age": 31 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["age"], 31);
    assert_eq!(updated["name"], "Alice");
    assert_eq!(updated["created_at"], alice["created_at"]);

    let response = send(&app, empty_request(Method::DELETE, "/api/v1/users/1")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(response).await.is_empty());

    assert!(list(&app, "age=31").await.is_empty());
    assert!(list(&app, "").await.is_empty());
}

#[tokio::test]
async fn test_create_rejects_duplicate_name() {
    let (app, users) = test_app();
    create(&app, "Alice", 30).await;

    let (status, body) = call(
        &app,
        json_request(Method::POST, "/api/v1/users", &json!({ "name": "Alice", "age": 99 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ALREADY_EXISTS");
    assert_eq!(body["status"], 409);
    assert_eq!(users.row_count().await, 1);
}

#[tokio::test]
async fn test_create_ignores_client_identifier() {
    let (app, _) = test_app();
    let (status, body) = call(
        &app,
        json_request(
            Method::POST,
            "/api/v1/users",
            &json!({ "id": 500, "name": "Bob", "deleted_at": "2020-01-01T00:00:00Z" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["age"], 0);
    assert!(body["deleted_at"].is_null());
}

#[tokio::test]
async fn test_create_malformed_bodies() {
    let (app, users) = test_app();

    let cases = [
        (Some("application/json"), "{not json"),
        (Some("application/json"), r#"{"age": 3}"#),
        (Some("application/json"), r#"{"name": "Eve", "age": "old"}"#),
        (Some("text/plain"), r#"{"name": "Eve"}"#),
        (None, r#"{"name": "Eve"}"#),
    ];
    for (content_type, body) in cases {
        let (status, error) = call(
            &app,
            raw_request(Method::POST, "/api/v1/users", content_type, body),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
        assert_eq!(error["status"], 400);
        assert!(error["error"].is_string());
    }
    assert_eq!(users.row_count().await, 0);
}

#[tokio::test]
async fn test_create_rejects_blank_name() {
    let (app, users) = test_app();
    let (status, body) = call(
        &app,
        json_request(Method::POST, "/api/v1/users", &json!({ "name": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(users.row_count().await, 0);
}

#[tokio::test]
async fn test_pagination() {
    let (app, _) = test_app();
    for (name, age) in [("Dan", 40), ("Alice", 30), ("Carol", 20), ("Bob", 25)] {
        create(&app, name, age).await;
    }

    assert_eq!(names(&list(&app, "limit=2").await), vec!["Alice", "Bob"]);
    assert_eq!(names(&list(&app, "page=2&limit=2").await), vec!["Carol", "Dan"]);
    assert_eq!(names(&list(&app, "page=3&limit=2").await), Vec::<&str>::new());

    let first = list(&app, "page=1&limit=2").await;
    assert_eq!(list(&app, "page=0&limit=2").await, first);
    assert_eq!(list(&app, "limit=2").await, first);
}

#[tokio::test]
async fn test_lenient_list_parameters() {
    let (app, _) = test_app();
    for i in 0..12 {
        create(&app, &format!("user{i:02}"), 20 + i).await;
    }

    // Non-numeric and non-positive values fall back to defaults
    assert_eq!(list(&app, "limit=abc").await.len(), 10);
    assert_eq!(list(&app, "limit=0").await.len(), 10);
    assert_eq!(list(&app, "limit=-1").await.len(), 10);
    assert_eq!(list(&app, "age=abc").await.len(), 10);
    assert_eq!(list(&app, "age=0&limit=100").await.len(), 12);
    assert_eq!(list(&app, "page=xyz").await, list(&app, "").await);
    assert_eq!(list(&app, "sort=").await, list(&app, "sort=name").await);
}

#[tokio::test]
async fn test_repeated_list_parameters_keep_first_value() {
    let (app, _) = test_app();
    for (name, age) in [("Alice", 30), ("Bob", 31), ("Carol", 30)] {
        create(&app, name, age).await;
    }

    assert_eq!(names(&list(&app, "age=30&age=31").await), vec!["Alice", "Carol"]);
    assert_eq!(names(&list(&app, "sort=-name&sort=name&limit=1&limit=5").await), vec!["Carol"]);
    assert_eq!(list(&app, "verbose=1&verbose=2").await.len(), 3);
}

#[tokio::test]
async fn test_large_limit_is_not_truncated() {
    let (app, _) = test_app();
    for i in 0..150 {
        create(&app, &format!("user{i:03}"), 20).await;
    }

    assert_eq!(list(&app, "limit=150").await.len(), 150);
    assert_eq!(list(&app, "limit=1000").await.len(), 150);
    assert_eq!(list(&app, "page=2&limit=100").await.len(), 50);
}

#[tokio::test]
async fn test_sorting() {
    let (app, _) = test_app();
    for (name, age) in [("Alice", 30), ("Bob", 25), ("Carol", 35)] {
        create(&app, name, age).await;
    }

    assert_eq!(names(&list(&app, "sort=age").await), vec!["Bob", "Alice", "Carol"]);
    assert_eq!(names(&list(&app, "sort=age%20desc").await), vec!["Carol", "Alice", "Bob"]);
    assert_eq!(names(&list(&app, "sort=-name").await), vec!["Carol", "Bob", "Alice"]);
    assert_eq!(names(&list(&app, "sort=Name%20DESC").await), vec!["Carol", "Bob", "Alice"]);
    assert_eq!(names(&list(&app, "sort=AGE").await), vec!["Bob", "Alice", "Carol"]);
}

#[tokio::test]
async fn test_unknown_sort_column_is_a_server_error() {
    let (app, _) = test_app();
    create(&app, "Alice", 30).await;

    let (status, body) = call(
        &app,
        empty_request(Method::GET, "/api/v1/users?sort=shoe_size"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INTERNAL_ERROR");
    assert_eq!(body["error"], "An internal error occurred");
}

#[tokio::test]
async fn test_update_is_field_additive() {
    let (app, _) = test_app();
    create(&app, "Alice", 30).await;

    let (status, body) = call(
        &app,
        json_request(Method::PUT, "/api/v1/users/1", &json!({ "name": "Alicia" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Alicia");
    assert_eq!(body["age"], 30);

    let (status, body) = call(&app, json_request(Method::PUT, "/api/v1/users/1", &json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Alicia");
    assert_eq!(body["age"], 30);
}

#[tokio::test]
async fn test_update_missing_user() {
    let (app, _) = test_app();

    for uri in ["/api/v1/users/42", "/api/v1/users/abc"] {
        let (status, body) = call(&app, json_request(Method::PUT, uri, &json!({ "age": 1 }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["code"], "NOT_FOUND");
    }

    // Existence is checked before the body is parsed
    let (status, _) = call(
        &app,
        raw_request(Method::PUT, "/api/v1/users/42", Some("application/json"), "{oops"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_malformed_body_writes_nothing() {
    let (app, _) = test_app();
    create(&app, "Alice", 30).await;

    let (status, _) = call(
        &app,
        raw_request(Method::PUT, "/api/v1/users/1", Some("application/json"), r#"{"age": "x"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let users = list(&app, "").await;
    assert_eq!(users[0]["age"], 30);
}

#[tokio::test]
async fn test_update_rename_conflict() {
    let (app, _) = test_app();
    create(&app, "Alice", 30).await;
    create(&app, "Bob", 25).await;

    let (status, body) = call(
        &app,
        json_request(Method::PUT, "/api/v1/users/2", &json!({ "name": "Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], 409);
}

#[tokio::test]
async fn test_soft_deleted_user_is_unreachable() {
    let (app, users) = test_app();
    create(&app, "Alice", 30).await;
    create(&app, "Bob", 25).await;

    let response = send(&app, empty_request(Method::DELETE, "/api/v1/users/1")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(names(&list(&app, "").await), vec!["Bob"]);

    let (status, _) = call(&app, json_request(Method::PUT, "/api/v1/users/1", &json!({ "age": 5 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, empty_request(Method::DELETE, "/api/v1/users/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The row is kept, and its name is free again
    assert_eq!(users.row_count().await, 2);
    let again = create(&app, "Alice", 50).await;
    assert_eq!(again["id"], 3);
}

#[tokio::test]
async fn test_delete_unknown_ids() {
    let (app, _) = test_app();
    for uri in ["/api/v1/users/7", "/api/v1/users/seven"] {
        let (status, body) = call(&app, empty_request(Method::DELETE, uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["status"], 404);
    }
}

#[tokio::test]
async fn test_request_id_header() {
    let (app, _) = test_app();

    let response = send(&app, empty_request(Method::GET, "/api/v1/users")).await;
    let id = response.headers()["x-request-id"].to_str().unwrap();
    assert!(id.starts_with("req_"));

    let mut request = empty_request(Method::GET, "/api/v1/users");
    request
        .headers_mut()
        .insert("x-request-id", "client-supplied".parse().unwrap());
    let response = send(&app, request).await;
    assert_eq!(response.headers()["x-request-id"], "client-supplied");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let mut config = Config::default();
    config.middleware.body_limit_mb = 1;
    let (app, users) = test_app_with(config);

    let name = "x".repeat(2 * 1024 * 1024);
    let payload = json!({ "name": name }).to_string();
    let mut request = raw_request(Method::POST, "/api/v1/users", Some("application/json"), &payload);
    request
        .headers_mut()
        .insert(header::CONTENT_LENGTH, payload.len().into());

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(users.row_count().await, 0);
}
