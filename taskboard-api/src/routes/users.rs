/// User endpoints
///
/// # Endpoints
///
/// - `GET /users` - List users as `{id, full_name}`, by name
/// - `POST /users` - Create a user
/// - `PUT /users/:id` - Partially update a user
/// - `DELETE /users/:id` - Delete a user

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{IdPath, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use taskboard_shared::models::user::{CreateUser, UpdateUser, User, UserSummary};
use super::not_blank;
use validator::Validate;

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 255, message = "Full name must be 1-255 characters"), custom(function = "not_blank"))]
    pub full_name: String,
}

/// Update user request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Full name must be 1-255 characters"), custom(function = "not_blank"))]
    pub full_name: Option<String>,
}

/// List users for assignee pickers
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserSummary>>> {
    let users = User::list_summaries(&state.db).await?;
    Ok(Json(users))
}

/// Create a user
///
/// # Errors
///
/// - `400 Bad Request`: Invalid email or blank name
/// - `409 Conflict`: Email already exists
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email.to_lowercase(),
            full_name: req.full_name,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User created");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Partially update a user
pub async fn update_user(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    let user = User::update(
        &state.db,
        id,
        UpdateUser {
            email: req.email.map(|email| email.to_lowercase()),
            full_name: req.full_name,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("User {} not found", id)))?;

    Ok(Json(user))
}

/// Delete a user
///
/// Tasks they were assigned or created stay, with the reference cleared.
pub async fn delete_user(State(state): State<AppState>, IdPath(id): IdPath) -> ApiResult<StatusCode> {
    if !User::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("User {} not found", id)));
    }

    tracing::info!(user_id = %id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}
