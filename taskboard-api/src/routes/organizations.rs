/// Organization endpoints
///
/// # Endpoints
///
/// - `GET /organizations` - List organizations by name
/// - `POST /organizations` - Create an organization
/// - `PUT /organizations/:id` - Partially update an organization
/// - `DELETE /organizations/:id` - Delete an organization and everything under it
/// - `GET /organizations/:id/workspaces` - List an organization's workspaces

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{IdPath, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use taskboard_shared::models::{
    nullable,
    organization::{CreateOrganization, Organization, UpdateOrganization},
    workspace::Workspace,
};
use super::not_blank;
use validator::Validate;

/// Create organization request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"), custom(function = "not_blank"))]
    pub name: String,

    pub description: Option<String>,
}

/// Update organization request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOrganizationRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"), custom(function = "not_blank"))]
    pub name: Option<String>,

    /// `null` clears the description
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

/// List organizations
pub async fn list_organizations(State(state): State<AppState>) -> ApiResult<Json<Vec<Organization>>> {
    let organizations = Organization::list(&state.db).await?;
    Ok(Json(organizations))
}

/// Create an organization
///
/// # Errors
///
/// - `400 Bad Request`: Missing or blank name
pub async fn create_organization(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateOrganizationRequest>,
) -> ApiResult<(StatusCode, Json<Organization>)> {
    let organization = Organization::create(
        &state.db,
        CreateOrganization {
            name: req.name,
            description: req.description,
        },
    )
    .await?;

    tracing::info!(organization_id = %organization.id, "Organization created");

    Ok((StatusCode::CREATED, Json(organization)))
}

/// Partially update an organization
///
/// # Errors
///
/// - `404 Not Found`: No such organization
pub async fn update_organization(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateOrganizationRequest>,
) -> ApiResult<Json<Organization>> {
    let organization = Organization::update(
        &state.db,
        id,
        UpdateOrganization {
            name: req.name,
            description: req.description,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Organization {} not found", id)))?;

    Ok(Json(organization))
}

/// Delete an organization
///
/// Its workspaces, boards, columns and tasks go with it.
pub async fn delete_organization(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<StatusCode> {
    if !Organization::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("Organization {} not found", id)));
    }

    tracing::info!(organization_id = %id, "Organization deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// List an organization's workspaces, oldest first
pub async fn list_organization_workspaces(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Vec<Workspace>>> {
    if Organization::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Organization {} not found", id)));
    }

    let workspaces = Workspace::list_by_organization(&state.db, id).await?;
    Ok(Json(workspaces))
}
