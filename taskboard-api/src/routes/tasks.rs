/// Task endpoints
///
/// Task cards are addressed by an `id` in the request body for update and
/// delete, which is the contract the board front-end already speaks.
///
/// # Endpoints
///
/// - `GET /tasks[?column_id=]` - List tasks with assignees
/// - `POST /tasks` - Create a task (appended to its column by default)
/// - `PUT /tasks` - Partially update a task
/// - `DELETE /tasks` - Delete a task
/// - `GET /tasks/:id/history` - Audit trail, newest first
/// - `POST /move-task` - Move a task to the tail of a column

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Filter, IdPath, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use taskboard_shared::{
    models::{
        nullable,
        task::{CreateTask, Task, TaskPriority, TaskWithAssignee, UpdateTask},
        task_history::TaskHistory,
    },
    reorder::{self, MoveTask},
};
use uuid::Uuid;
use super::not_blank;
use validator::Validate;

/// Query filter for listing tasks
#[derive(Debug, Default, Deserialize)]
pub struct TaskFilter {
    pub column_id: Option<Uuid>,
}

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    pub column_id: Uuid,

    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"), custom(function = "not_blank"))]
    pub title: String,

    pub description: Option<String>,

    /// Omit to append after the column's last task
    #[validate(range(min = 0, max = 1_000_000_000, message = "order_index must be between 0 and 1000000000"))]
    pub order_index: Option<i32>,

    pub assignee_id: Option<Uuid>,

    /// `low`, `medium` or `high`
    pub priority: Option<TaskPriority>,

    pub task_window_start: Option<DateTime<Utc>>,

    pub task_window_deadline: Option<DateTime<Utc>>,

    pub created_by: Option<Uuid>,
}

/// Update task request
///
/// Absent fields stay untouched; `null` clears a nullable field.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    pub id: Uuid,

    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"), custom(function = "not_blank"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    pub assignee_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "nullable")]
    pub priority: Option<Option<TaskPriority>>,

    #[serde(default, deserialize_with = "nullable")]
    pub task_window_start: Option<Option<DateTime<Utc>>>,

    #[serde(default, deserialize_with = "nullable")]
    pub task_window_deadline: Option<Option<DateTime<Utc>>>,

    /// Acting user, recorded in the history
    pub updated_by: Option<Uuid>,
}

/// Delete task request
#[derive(Debug, Deserialize, Validate)]
pub struct DeleteTaskRequest {
    pub id: Uuid,
}

/// Move task request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MoveTaskRequest {
    pub task_id: Uuid,

    /// Destination column
    pub column_id: Uuid,

    pub user_id: Option<Uuid>,
}

/// List tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Filter(filter): Filter<TaskFilter>,
) -> ApiResult<Json<Vec<TaskWithAssignee>>> {
    let tasks = Task::list(&state.db, filter.column_id).await?;
    Ok(Json(tasks))
}

/// Create a task
///
/// # Endpoint
///
/// ```text
/// POST /tasks
/// Content-Type: application/json
///
/// {
///   "column_id": "uuid",
///   "title": "Write release notes",
///   "priority": "high"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing title or column_id, unknown priority
/// - `409 Conflict`: Column, assignee or creator does not exist
pub async fn create_task(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = Task::create(
        &state.db,
        CreateTask {
            column_id: req.column_id,
            title: req.title,
            description: req.description,
            order_index: req.order_index,
            assignee_id: req.assignee_id,
            priority: req.priority,
            task_window_start: req.task_window_start,
            task_window_deadline: req.task_window_deadline,
            created_by: req.created_by,
        },
    )
    .await?;

    tracing::info!(
        task_id = %task.id,
        column_id = %task.column_id,
        order_index = task.order_index,
        "Task created"
    );

    Ok((StatusCode::CREATED, Json(task)))
}

/// Partially update a task
///
/// # Errors
///
/// - `404 Not Found`: No such task
/// - `409 Conflict`: Assignee does not exist
pub async fn update_task(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let id = req.id;

    let task = Task::update(
        &state.db,
        id,
        UpdateTask {
            title: req.title,
            description: req.description,
            assignee_id: req.assignee_id,
            priority: req.priority,
            task_window_start: req.task_window_start,
            task_window_deadline: req.task_window_deadline,
            updated_by: req.updated_by,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Task {} not found", id)))?;

    Ok(Json(task))
}

/// Delete a task
pub async fn delete_task(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<DeleteTaskRequest>,
) -> ApiResult<StatusCode> {
    if !Task::delete(&state.db, req.id).await? {
        return Err(ApiError::NotFound(format!("Task {} not found", req.id)));
    }

    tracing::info!(task_id = %req.id, "Task deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// List a task's history
pub async fn list_task_history(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Vec<TaskHistory>>> {
    if Task::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Task {} not found", id)));
    }

    let history = TaskHistory::list_by_task(&state.db, id).await?;
    Ok(Json(history))
}

/// Move a task to the tail of a column
///
/// # Endpoint
///
/// ```text
/// POST /move-task
/// Content-Type: application/json
///
/// { "taskId": "uuid", "columnId": "uuid" }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: No such task
/// - `409 Conflict`: Destination column does not exist
pub async fn move_task(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<MoveTaskRequest>,
) -> ApiResult<Json<Task>> {
    let task = reorder::move_task(
        &state.db,
        MoveTask {
            task_id: req.task_id,
            column_id: req.column_id,
            user_id: req.user_id,
        },
    )
    .await?;

    Ok(Json(task))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_distinguishes_null_from_absent() {
        let id = Uuid::new_v4();
        let req: UpdateTaskRequest = serde_json::from_value(serde_json::json!({
            "id": id,
            "title": "Renamed",
            "assignee_id": null
        }))
        .unwrap();

        assert_eq!(req.id, id);
        assert_eq!(req.title.as_deref(), Some("Renamed"));
        assert_eq!(req.assignee_id, Some(None));
        assert!(req.description.is_none());
        assert!(req.priority.is_none());
    }

    #[test]
    fn test_create_request_rejects_unknown_priority() {
        let result: Result<CreateTaskRequest, _> = serde_json::from_value(serde_json::json!({
            "column_id": Uuid::new_v4(),
            "title": "Ship it",
            "priority": "urgent"
        }));

        assert!(result.is_err());
    }

    #[test]
    fn test_create_request_blank_title_fails_validation() {
        let req: CreateTaskRequest = serde_json::from_value(serde_json::json!({
            "column_id": Uuid::new_v4(),
            "title": ""
        }))
        .unwrap();

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_whitespace_title_fails_validation() {
        let req: CreateTaskRequest = serde_json::from_value(serde_json::json!({
            "column_id": Uuid::new_v4(),
            "title": "   "
        }))
        .unwrap();

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn test_create_request_order_index_bound() {
        use taskboard_shared::reorder::MAX_ORDER_INDEX;

        let at_bound: CreateTaskRequest = serde_json::from_value(serde_json::json!({
            "column_id": Uuid::new_v4(),
            "title": "Last slot",
            "order_index": MAX_ORDER_INDEX
        }))
        .unwrap();
        assert!(at_bound.validate().is_ok());

        let past_bound: CreateTaskRequest = serde_json::from_value(serde_json::json!({
            "column_id": Uuid::new_v4(),
            "title": "Too far",
            "order_index": i32::MAX
        }))
        .unwrap();
        assert!(past_bound.validate().is_err());
    }

    #[test]
    fn test_move_request_uses_camel_case() {
        let task_id = Uuid::new_v4();
        let column_id = Uuid::new_v4();
        let req: MoveTaskRequest = serde_json::from_value(serde_json::json!({
            "taskId": task_id,
            "columnId": column_id
        }))
        .unwrap();

        assert_eq!(req.task_id, task_id);
        assert_eq!(req.column_id, column_id);
        assert!(req.user_id.is_none());
    }
}
