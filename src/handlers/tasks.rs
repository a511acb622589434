use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::Task;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::task_service::TaskPatch;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
}

/// GET /api/tasks - All tasks owned by the caller, newest first
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let tasks = state.tasks.list(caller.id).await?;

    Ok(Json(json!({
        "message": "Tasks retrieved successfully",
        "tasks": tasks,
        "total": tasks.len(),
    })))
}

/// GET /api/tasks/:id - Single task by id
pub async fn get_task(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Task>, ApiError> {
    let task = state.tasks.get(caller.id, id).await?;
    Ok(Json(task))
}

/// POST /api/tasks - Create a task owned by the caller
pub async fn create_task(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let task = state
        .tasks
        .create(caller.id, payload.title, payload.description, payload.priority)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Task created successfully",
            "task": task,
        })),
    ))
}

/// PUT /api/tasks/:id - Partial update; omitted fields keep stored values
pub async fn update_task(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Value>, ApiError> {
    let task = state.tasks.update(caller.id, id, patch).await?;

    Ok(Json(json!({
        "message": "Task updated successfully",
        "task": task,
    })))
}

/// DELETE /api/tasks/:id - Permanently remove a task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    state.tasks.delete(caller.id, id).await?;

    Ok(Json(json!({
        "message": "Task deleted successfully",
    })))
}
