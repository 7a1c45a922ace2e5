//! Shared helpers for the HTTP integration tests
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::util::ServiceExt;
use user_service::{config::Config, repository::MemoryUserRepository};

/// Full application over a fresh in-memory store
pub fn test_app() -> (Router, MemoryUserRepository) {
    test_app_with(Config::default())
}

pub fn test_app_with(config: Config) -> (Router, MemoryUserRepository) {
    let users = MemoryUserRepository::new();
    (user_service::app(config, users.clone()), users)
}

pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn raw_request(method: Method, uri: &str, content_type: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

/// Send a request and decode the JSON body (`Value::Null` when empty)
pub async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = send(app, request).await;
    let status = response.status();
    let bytes = body_bytes(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn create(app: &Router, name: &str, age: i64) -> Value {
    let (status, body) = call(
        app,
        json_request(
            Method::POST,
            "/api/v1/users",
            &serde_json::json!({ "name": name, "age": age }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create {name}: {body}");
    body
}

pub async fn list(app: &Router, query: &str) -> Vec<Value> {
    let uri = if query.is_empty() {
        "/api/v1/users".to_string()
    } else {
        format!("/api/v1/users?{query}")
    };
    let (status, body) = call(app, empty_request(Method::GET, &uri)).await;
    assert_eq!(status, StatusCode::OK, "list {uri}: {body}");
    body.as_array().cloned().unwrap()
}

pub fn names(users: &[Value]) -> Vec<&str> {
    users.iter().map(|u| u["name"].as_str().unwrap()).collect()
}
