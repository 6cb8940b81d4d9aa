/// Board endpoints
///
/// # Endpoints
///
/// - `GET /boards[?workspace_id=]` - Boards with columns, tasks and assignees
/// - `POST /boards` - Create a board
/// - `PUT /boards/:id` - Partially update a board
/// - `DELETE /boards/:id` - Delete a board with its columns and tasks

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Filter, IdPath, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use taskboard_shared::models::{
    board::{Board, BoardWithColumns, CreateBoard, UpdateBoard},
    nullable,
};
use uuid::Uuid;
use super::not_blank;
use validator::Validate;

/// Query filter for listing boards
#[derive(Debug, Default, Deserialize)]
pub struct BoardFilter {
    pub workspace_id: Option<Uuid>,
}

/// Create board request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBoardRequest {
    pub workspace_id: Uuid,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"), custom(function = "not_blank"))]
    pub name: String,

    pub description: Option<String>,

    pub created_by: Option<Uuid>,
}

/// Update board request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBoardRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"), custom(function = "not_blank"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

/// List boards with their columns and tasks
///
/// # Response
///
/// ```json
/// [
///   {
///     "id": "uuid", "workspace_id": "uuid", "name": "Sprint 12", ...,
///     "columns": [
///       {
///         "id": "uuid", "title": "To Do", "order_index": 0, ...,
///         "tasks": [
///           { "id": "uuid", "title": "Write docs", "order_index": 0, ...,
///             "assignee": { "id": "uuid", "full_name": "Ada Lovelace" } }
///         ]
///       }
///     ]
///   }
/// ]
/// ```
pub async fn list_boards(
    State(state): State<AppState>,
    Filter(filter): Filter<BoardFilter>,
) -> ApiResult<Json<Vec<BoardWithColumns>>> {
    let boards = Board::list_with_columns(&state.db, filter.workspace_id).await?;
    Ok(Json(boards))
}

/// Create a board
///
/// # Errors
///
/// - `409 Conflict`: Workspace does not exist
pub async fn create_board(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateBoardRequest>,
) -> ApiResult<(StatusCode, Json<Board>)> {
    let board = Board::create(
        &state.db,
        CreateBoard {
            workspace_id: req.workspace_id,
            name: req.name,
            description: req.description,
            created_by: req.created_by,
        },
    )
    .await?;

    tracing::info!(board_id = %board.id, workspace_id = %board.workspace_id, "Board created");

    Ok((StatusCode::CREATED, Json(board)))
}

/// Partially update a board
pub async fn update_board(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateBoardRequest>,
) -> ApiResult<Json<Board>> {
    let board = Board::update(
        &state.db,
        id,
        UpdateBoard {
            name: req.name,
            description: req.description,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Board {} not found", id)))?;

    Ok(Json(board))
}

/// Delete a board
pub async fn delete_board(State(state): State<AppState>, IdPath(id): IdPath) -> ApiResult<StatusCode> {
    if !Board::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("Board {} not found", id)));
    }

    tracing::info!(board_id = %id, "Board deleted");

    Ok(StatusCode::NO_CONTENT)
}
