/// Task endpoints
///
/// # Endpoints
///
/// - `GET    /api/tasks` - List the caller's tasks
/// - `POST   /api/tasks` - Create a task
/// - `PATCH  /api/tasks/:id` - Partially update a task
/// - `DELETE /api/tasks/:id` - Delete a task
///
/// Every handler runs the bearer gate first: the `Authorization` header is
/// handed to [`AuthService::verify_bearer`](taskboard_shared::auth::AuthService::verify_bearer)
/// and the resulting identity scopes all store access. A missing or invalid
/// token is a 403 before any task logic runs.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::{models::task::Task, tasks, tasks::TaskPatch};
use uuid::Uuid;

/// Create request; `task` is the item's text
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// Task text
    pub task: String,
}

/// Partial update request
///
/// Both fields optional: omitted (or empty) text keeps the current text,
/// omitted `completed` keeps the current flag. An explicit
/// `"completed": false` is applied, not ignored.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    /// Replacement text
    pub task: Option<String>,

    /// Replacement completion flag
    pub completed: Option<bool>,
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Confirmation message
    pub message: String,
}

/// Pulls the raw `Authorization` header value, if any
fn bearer_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

/// List the caller's tasks
///
/// Returns every task owned by the authenticated user, in store order.
///
/// # Errors
///
/// - `403 Forbidden`: missing or invalid token
/// - `500 Internal Server Error`: store failure
pub async fn list_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Task>>> {
    let user_id = state.auth.verify_bearer(bearer_header(&headers))?;

    let tasks = tasks::list_tasks(&state.db, user_id).await?;

    Ok(Json(tasks))
}

/// Create a task
///
/// # Endpoint
///
/// ```text
/// POST /api/tasks
/// Authorization: Bearer <token>
///
/// { "task": "buy milk" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: empty task text
/// - `403 Forbidden`: missing or invalid token
/// - `500 Internal Server Error`: store failure
pub async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let user_id = state.auth.verify_bearer(bearer_header(&headers))?;

    if req.task.is_empty() {
        return Err(ApiError::BadRequest("Task text must not be empty".to_string()));
    }

    let task = tasks::create_task(&state.db, user_id, &req.task).await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Partially update a task
///
/// # Endpoint
///
/// ```text
/// PATCH /api/tasks/:id
/// Authorization: Bearer <token>
///
/// { "task": "buy oat milk", "completed": true }
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: missing/invalid token, or the task belongs to someone else
/// - `404 Not Found`: no task with that id
/// - `500 Internal Server Error`: store failure
pub async fn update_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(task_id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let user_id = state.auth.verify_bearer(bearer_header(&headers))?;

    let patch = TaskPatch {
        text: req.task,
        completed: req.completed,
    };

    let task = tasks::update_task(&state.db, user_id, task_id, patch).await?;

    Ok(Json(task))
}

/// Delete a task
///
/// # Errors
///
/// - `403 Forbidden`: missing/invalid token, or the task belongs to someone else
/// - `404 Not Found`: no task with that id
/// - `500 Internal Server Error`: store failure
pub async fn delete_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let user_id = state.auth.verify_bearer(bearer_header(&headers))?;

    tasks::delete_task(&state.db, user_id, task_id).await?;

    Ok(Json(DeleteResponse {
        message: "Task deleted".to_string(),
    }))
}
