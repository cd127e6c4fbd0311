/// Task endpoints
///
/// ```text
/// GET    /v1/tasks?status=todo&priority=high
/// POST   /v1/tasks            {"title": "...", "assignees": "Jane Smith", "columnId": "<uuid>"}
/// GET    /v1/tasks/:id
/// PATCH  /v1/tasks/:id        {"status": "done"}
/// DELETE /v1/tasks/:id
/// POST   /v1/tasks/:id/move   {"columnId": "<uuid>", "orderIndex": 2}
/// ```
///
/// New tasks go through the task form rules (title up to 100 characters, at
/// least one valid assignee, due date not in the past) before the service's
/// own sanitization.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use kanban_shared::board::TaskForm;
use kanban_shared::models::task::{Task, TaskPriority, TaskStatus, UpdateTask};
use kanban_shared::validation::parse_id;
use serde::{Deserialize, Serialize};

fn task_not_found() -> ApiError {
    ApiError::NotFound("Task not found".to_string())
}

/// Query filters for listing tasks
#[derive(Debug, Default, Deserialize)]
pub struct TaskFilter {
    pub status: Option<String>,
    pub priority: Option<String>,
}

impl TaskFilter {
    fn parsed(&self) -> ApiResult<(Option<TaskStatus>, Option<TaskPriority>)> {
        let status = self
            .status
            .as_deref()
            .map(str::parse::<TaskStatus>)
            .transpose()
            .map_err(|e| ApiError::BadRequest(format!("Invalid status filter: {}", e.0)))?;
        let priority = self
            .priority
            .as_deref()
            .map(str::parse::<TaskPriority>)
            .transpose()
            .map_err(|e| ApiError::BadRequest(format!("Invalid priority filter: {}", e.0)))?;
        Ok((status, priority))
    }
}

/// New task request: the task form plus optional column placement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(flatten)]
    pub form: TaskForm,

    #[serde(default)]
    pub column_id: Option<String>,

    #[serde(default)]
    pub order_index: Option<i32>,
}

/// Move request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTaskRequest {
    pub column_id: String,

    #[serde(default)]
    pub order_index: i32,
}

/// Lists tasks, optionally filtered by status and/or priority
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(filter): Query<TaskFilter>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = match filter.parsed()? {
        (None, None) => state.tasks.get_all().await?,
        (Some(status), priority) => {
            let mut tasks = state.tasks.get_by_status(status).await?;
            if let Some(priority) = priority {
                tasks.retain(|t| t.priority == priority);
            }
            tasks
        }
        (None, Some(priority)) => state.tasks.get_by_priority(priority).await?,
    };

    Ok(Json(tasks))
}

/// Creates a task from the task form
pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let Json(request) = payload?;
    let today = Utc::now().date_naive();

    let form = request.form.normalized();
    form.validate_on(today)?;

    let column_id = request
        .column_id
        .as_deref()
        .map(|id| parse_id(id, "column"))
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let mut data = form.into_create_task(today);
    data.column_id = column_id;
    data.order_index = request.order_index.unwrap_or_default();

    let task = state.tasks.create(data).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    let task = state
        .tasks
        .get_by_id(&id)
        .await?
        .ok_or_else(task_not_found)?;
    Ok(Json(task))
}

/// Merges the provided fields into a task
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTask>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let Json(patch) = payload?;
    let task = state
        .tasks
        .update(&id, patch)
        .await?
        .ok_or_else(task_not_found)?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.tasks.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(task_not_found())
    }
}

/// Places a task in a column at a position
pub async fn move_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<MoveTaskRequest>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let Json(request) = payload?;
    let task = state
        .tasks
        .move_task(&id, &request.column_id, request.order_index)
        .await?
        .ok_or_else(task_not_found)?;
    Ok(Json(task))
}
