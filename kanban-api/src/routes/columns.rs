/// Column endpoints
///
/// ```text
/// GET    /v1/columns
/// POST   /v1/columns                     {"name": "Review", "orderIndex": 3}
/// PUT    /v1/columns/reorder             {"ids": ["<uuid>", ...]}
/// GET    /v1/columns/:id
/// PATCH  /v1/columns/:id                 {"name": "QA"}
/// DELETE /v1/columns/:id
/// GET    /v1/columns/:id/tasks
/// PUT    /v1/columns/:id/tasks/reorder   {"ids": ["<uuid>", ...]}
/// ```

use super::ReorderRequest;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use kanban_shared::models::column::{Column, CreateColumn, UpdateColumn};
use kanban_shared::models::task::Task;

fn column_not_found() -> ApiError {
    ApiError::NotFound("Column not found".to_string())
}

pub async fn list_columns(State(state): State<AppState>) -> ApiResult<Json<Vec<Column>>> {
    Ok(Json(state.columns.get_all().await?))
}

pub async fn create_column(
    State(state): State<AppState>,
    payload: Result<Json<CreateColumn>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Column>)> {
    let Json(data) = payload?;
    let column = state.columns.create(data).await?;
    Ok((StatusCode::CREATED, Json(column)))
}

pub async fn get_column(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Column>> {
    let column = state
        .columns
        .get_by_id(&id)
        .await?
        .ok_or_else(column_not_found)?;
    Ok(Json(column))
}

pub async fn update_column(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateColumn>, JsonRejection>,
) -> ApiResult<Json<Column>> {
    let Json(data) = payload?;
    let column = state
        .columns
        .update(&id, data)
        .await?
        .ok_or_else(column_not_found)?;
    Ok(Json(column))
}

/// Deletes a column together with all of its tasks
pub async fn delete_column(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.columns.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(column_not_found())
    }
}

/// Applies a new column order and returns the reordered list
pub async fn reorder_columns(
    State(state): State<AppState>,
    payload: Result<Json<ReorderRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<Column>>> {
    let Json(request) = payload?;

    if !state.columns.reorder(&request.ids).await? {
        return Err(ApiError::NotFound(
            "One or more columns not found".to_string(),
        ));
    }

    Ok(Json(state.columns.get_all().await?))
}

pub async fn list_column_tasks(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.tasks.get_by_column_id(&id).await?))
}

/// Applies a new task order within a column and returns the column's tasks
pub async fn reorder_column_tasks(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ReorderRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<Task>>> {
    let Json(request) = payload?;

    if !state.tasks.reorder_tasks(&id, &request.ids).await? {
        return Err(ApiError::NotFound("One or more tasks not found".to_string()));
    }

    Ok(Json(state.tasks.get_by_column_id(&id).await?))
}
