/// Task history model
///
/// Append-only audit trail for tasks. Rows are written inside the same
/// transaction as the change they describe and are removed only when their
/// task is deleted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE task_history (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     user_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     action_type VARCHAR(50) NOT NULL,
///     old_value JSONB,
///     new_value JSONB,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Kind of change recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskHistoryAction {
    /// Column or position changed
    Moved,

    /// Editable fields changed
    Updated,
}

impl TaskHistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskHistoryAction::Moved => "moved",
            TaskHistoryAction::Updated => "updated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "moved" => Some(TaskHistoryAction::Moved),
            "updated" => Some(TaskHistoryAction::Updated),
            _ => None,
        }
    }
}

/// History row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskHistory {
    pub id: Uuid,

    pub task_id: Uuid,

    /// Acting user, when known
    pub user_id: Option<Uuid>,

    /// See [`TaskHistoryAction`]
    pub action_type: String,

    /// State before the change
    pub old_value: Option<JsonValue>,

    /// State after the change
    pub new_value: Option<JsonValue>,

    pub created_at: DateTime<Utc>,
}

impl TaskHistory {
    /// Gets the parsed action
    pub fn action(&self) -> Option<TaskHistoryAction> {
        TaskHistoryAction::parse(&self.action_type)
    }
}

/// Input for appending a history row
#[derive(Debug, Clone)]
pub struct NewTaskHistory {
    pub task_id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: TaskHistoryAction,
    pub old_value: Option<JsonValue>,
    pub new_value: Option<JsonValue>,
}

impl TaskHistory {
    /// Appends a row on an open connection (normally a transaction)
    pub async fn record(conn: &mut PgConnection, entry: NewTaskHistory) -> Result<Self, sqlx::Error> {
        let row = sqlx::query_as::<_, TaskHistory>(
            r#"
            INSERT INTO task_history (task_id, user_id, action_type, old_value, new_value)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, task_id, user_id, action_type, old_value, new_value, created_at
            "#,
        )
        .bind(entry.task_id)
        .bind(entry.user_id)
        .bind(entry.action.as_str())
        .bind(entry.old_value)
        .bind(entry.new_value)
        .fetch_one(&mut *conn)
        .await?;

        Ok(row)
    }

    /// Lists a task's history, newest first
    pub async fn list_by_task(pool: &PgPool, task_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TaskHistory>(
            r#"
            SELECT id, task_id, user_id, action_type, old_value, new_value, created_at
            FROM task_history
            WHERE task_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_round_trips_through_str() {
        for action in [TaskHistoryAction::Moved, TaskHistoryAction::Updated] {
            assert_eq!(TaskHistoryAction::parse(action.as_str()), Some(action));
        }
        assert_eq!(TaskHistoryAction::parse("deleted"), None);
    }
}
