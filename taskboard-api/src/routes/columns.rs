/// Column endpoints
///
/// # Endpoints
///
/// - `GET /columns[?board_id=]` - List columns by board, then position
/// - `POST /columns` - Create a column (appended to the board by default)
/// - `PUT /columns/:id` - Partially update a column
/// - `DELETE /columns/:id` - Delete a column with its tasks

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Filter, IdPath, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use taskboard_shared::models::column::{Column, CreateColumn, UpdateColumn};
use uuid::Uuid;
use super::not_blank;
use validator::Validate;

/// Query filter for listing columns
#[derive(Debug, Default, Deserialize)]
pub struct ColumnFilter {
    pub board_id: Option<Uuid>,
}

/// Create column request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateColumnRequest {
    pub board_id: Uuid,

    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"), custom(function = "not_blank"))]
    pub title: String,

    #[validate(range(min = 0, max = 1_000_000_000, message = "order_index must be between 0 and 1000000000"))]
    pub order_index: Option<i32>,
}

/// Update column request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateColumnRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"), custom(function = "not_blank"))]
    pub title: Option<String>,

    #[validate(range(min = 0, max = 1_000_000_000, message = "order_index must be between 0 and 1000000000"))]
    pub order_index: Option<i32>,
}

/// List columns
pub async fn list_columns(
    State(state): State<AppState>,
    Filter(filter): Filter<ColumnFilter>,
) -> ApiResult<Json<Vec<Column>>> {
    let columns = Column::list(&state.db, filter.board_id).await?;
    Ok(Json(columns))
}

/// Create a column
///
/// # Errors
///
/// - `409 Conflict`: Board does not exist
pub async fn create_column(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateColumnRequest>,
) -> ApiResult<(StatusCode, Json<Column>)> {
    let column = Column::create(
        &state.db,
        CreateColumn {
            board_id: req.board_id,
            title: req.title,
            order_index: req.order_index,
        },
    )
    .await?;

    tracing::info!(
        column_id = %column.id,
        board_id = %column.board_id,
        order_index = column.order_index,
        "Column created"
    );

    Ok((StatusCode::CREATED, Json(column)))
}

/// Partially update a column
pub async fn update_column(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateColumnRequest>,
) -> ApiResult<Json<Column>> {
    let column = Column::update(
        &state.db,
        id,
        UpdateColumn {
            title: req.title,
            order_index: req.order_index,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Column {} not found", id)))?;

    Ok(Json(column))
}

/// Delete a column
pub async fn delete_column(State(state): State<AppState>, IdPath(id): IdPath) -> ApiResult<StatusCode> {
    if !Column::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("Column {} not found", id)));
    }

    tracing::info!(column_id = %id, "Column deleted");

    Ok(StatusCode::NO_CONTENT)
}
