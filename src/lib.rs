use axum::{
    extract::{OriginalUri, State},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

use services::{AuthService, TaskService};

/// Process-wide context: the store connection plus the services built on it.
/// Created once at startup and handed to the router.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub auth: AuthService,
    pub tasks: TaskService,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            auth: AuthService::new(db.clone()),
            tasks: TaskService::new(db.clone()),
            db,
        }
    }
}

pub fn app(state: AppState) -> Router {
    // Everything under /api/tasks requires a verified identity
    let protected = Router::new()
        .route(
            "/api/tasks",
            get(handlers::tasks::list_tasks).post(handlers::tasks::create_task),
        )
        .route(
            "/api/tasks/:id",
            get(handlers::tasks::get_task)
                .put(handlers::tasks::update_task)
                .delete(handlers::tasks::delete_task),
        )
        .route_layer(axum::middleware::from_fn(middleware::jwt_auth_middleware));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes
        .route("/api/register", post(handlers::auth::register))
        .route("/api/login", post(handlers::auth::login))
        // Protected API
        .merge(protected)
        .fallback(not_found)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "message": "Welcome to Task Management API",
        "version": version,
        "endpoints": {
            "health": "/health",
            "register": "POST /api/register",
            "login": "POST /api/login",
            "tasks": "GET /api/tasks (requires auth)",
            "createTask": "POST /api/tasks (requires auth)",
            "updateTask": "PUT /api/tasks/:id (requires auth)",
            "deleteTask": "DELETE /api/tasks/:id (requires auth)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let environment = config::config().environment.as_str();

    match database::health_check(&state.db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "OK",
                "message": "Task API is running",
                "environment": environment,
                "timestamp": now,
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "message": "Database unavailable",
                "environment": environment,
                "timestamp": now,
                "error": e.to_string(),
            })),
        ),
    }
}

async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Endpoint not found",
            "message": format!("{} {} is not a valid endpoint", method, uri.path()),
        })),
    )
}
