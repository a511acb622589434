#![allow(dead_code)]

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use task_api::{app, database, AppState};

/// Build the full router over a fresh in-memory database.
pub async fn test_app() -> Result<Router> {
    // A single connection keeps every query on the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    database::migrate(&pool).await?;
    Ok(app(AppState::new(pool)))
}

/// Drive one request through the router and decode the JSON body.
pub async fn request(
    router: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    let response = router.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok((status, value))
}

/// Register a user and log in, returning the bearer token.
pub async fn register_and_login(router: &Router, name: &str, email: &str) -> Result<String> {
    let (status, _) = request(
        router,
        Method::POST,
        "/api/register",
        None,
        Some(json!({ "name": name, "email": email, "password": "password123" })),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::CREATED, "registration failed: {}", status);

    let (status, body) = request(
        router,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "email": email, "password": "password123" })),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::OK, "login failed: {}", status);

    let token = body["token"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("no token in login response"))?;
    Ok(token.to_string())
}

/// Create a task and return its id.
pub async fn create_task(router: &Router, token: &str, body: Value) -> Result<(StatusCode, Value)> {
    request(router, Method::POST, "/api/tasks", Some(token), Some(body)).await
}
