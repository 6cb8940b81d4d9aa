/// Workspace endpoints
///
/// # Endpoints
///
/// - `GET /workspaces` - List workspaces by name
/// - `POST /workspaces` - Create a workspace in an organization
/// - `PUT /workspaces/:id` - Partially update a workspace
/// - `DELETE /workspaces/:id` - Delete a workspace with its boards, columns and tasks

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{IdPath, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use taskboard_shared::models::{
    nullable,
    workspace::{CreateWorkspace, UpdateWorkspace, Workspace},
};
use uuid::Uuid;
use super::not_blank;
use validator::Validate;

/// Create workspace request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorkspaceRequest {
    pub organization_id: Uuid,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"), custom(function = "not_blank"))]
    pub name: String,

    pub description: Option<String>,

    #[validate(length(max = 255, message = "Icon must be at most 255 characters"))]
    pub icon: Option<String>,

    pub created_by: Option<Uuid>,
}

/// Update workspace request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateWorkspaceRequest {
    pub organization_id: Option<Uuid>,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"), custom(function = "not_blank"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    pub icon: Option<Option<String>>,
}

/// List workspaces
pub async fn list_workspaces(State(state): State<AppState>) -> ApiResult<Json<Vec<Workspace>>> {
    let workspaces = Workspace::list(&state.db).await?;
    Ok(Json(workspaces))
}

/// Create a workspace
///
/// # Errors
///
/// - `400 Bad Request`: Missing organization_id or name
/// - `409 Conflict`: Organization does not exist
pub async fn create_workspace(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateWorkspaceRequest>,
) -> ApiResult<(StatusCode, Json<Workspace>)> {
    let workspace = Workspace::create(
        &state.db,
        CreateWorkspace {
            organization_id: req.organization_id,
            name: req.name,
            description: req.description,
            icon: req.icon,
            created_by: req.created_by,
        },
    )
    .await?;

    tracing::info!(
        workspace_id = %workspace.id,
        organization_id = %workspace.organization_id,
        "Workspace created"
    );

    Ok((StatusCode::CREATED, Json(workspace)))
}

/// Partially update a workspace
pub async fn update_workspace(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateWorkspaceRequest>,
) -> ApiResult<Json<Workspace>> {
    let workspace = Workspace::update(
        &state.db,
        id,
        UpdateWorkspace {
            organization_id: req.organization_id,
            name: req.name,
            description: req.description,
            icon: req.icon,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Workspace {} not found", id)))?;

    Ok(Json(workspace))
}

/// Delete a workspace
pub async fn delete_workspace(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<StatusCode> {
    if !Workspace::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("Workspace {} not found", id)));
    }

    tracing::info!(workspace_id = %id, "Workspace deleted");

    Ok(StatusCode::NO_CONTENT)
}
