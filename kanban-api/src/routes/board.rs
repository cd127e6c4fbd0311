/// Board endpoints
///
/// ```text
/// GET  /v1/board
/// POST /v1/board/drop   {"taskId": "<uuid>", "target": "done"}
/// ```
///
/// Each request loads a fresh [`Board`] over the task service, so the
/// response always reflects the database.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use kanban_shared::board::{Board, Lane};
use kanban_shared::validation::parse_id;
use serde::{Deserialize, Serialize};

/// Board snapshot
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub lanes: Vec<Lane>,
}

/// Drop request: the dragged task and the lane it was released over
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropRequest {
    pub task_id: String,

    /// Lane id (`todo`, `inprogress`, `done`); anything else is ignored
    #[serde(default)]
    pub target: Option<String>,
}

/// Result of a drop
#[derive(Debug, Serialize)]
pub struct DropResponse {
    /// Whether the task changed lanes
    pub moved: bool,

    pub lanes: Vec<Lane>,
}

pub async fn get_board(State(state): State<AppState>) -> ApiResult<Json<BoardResponse>> {
    let board = Board::load(state.tasks.clone()).await?;
    Ok(Json(BoardResponse {
        lanes: board.lanes(),
    }))
}

/// Ends a drag: writes the new status when the target is a lane
pub async fn drop_task(
    State(state): State<AppState>,
    payload: Result<Json<DropRequest>, JsonRejection>,
) -> ApiResult<Json<DropResponse>> {
    let Json(request) = payload?;
    let task_id = parse_id(&request.task_id, "task").map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let mut board = Board::load(state.tasks.clone()).await?;

    board.drag_start(task_id);
    if board.active_task().is_none() {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    let moved = board.drag_end(task_id, request.target.as_deref()).await?;

    Ok(Json(DropResponse {
        moved,
        lanes: board.lanes(),
    }))
}
