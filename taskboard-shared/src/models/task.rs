/// Task model and database operations
///
/// Tasks are the cards on a board. Each belongs to exactly one column and
/// carries an `order_index` that orders it among its siblings. Moving a task
/// between columns lives in [`crate::reorder`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     column_id UUID NOT NULL REFERENCES columns(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     order_index INTEGER NOT NULL,
///     assignee_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     priority VARCHAR(50),
///     task_window_start TIMESTAMPTZ,
///     task_window_deadline TIMESTAMPTZ,
///     created_by UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT tasks_priority_check CHECK (
///         priority IS NULL OR priority IN ('low', 'medium', 'high')
///     )
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{CreateTask, Task, TaskPriority, UpdateTask};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, column_id: Uuid) -> Result<(), sqlx::Error> {
/// let mut create = CreateTask::new(column_id, "Write release notes");
/// create.priority = Some(TaskPriority::High);
/// let task = Task::create(&pool, create).await?;
///
/// // Only the title changes; everything else is kept
/// Task::update(&pool, task.id, UpdateTask {
///     title: Some("Write the release notes".to_string()),
///     ..Default::default()
/// }).await?;
/// # Ok(())
/// # }
/// ```

use crate::models::task_history::{NewTaskHistory, TaskHistory, TaskHistoryAction};
use crate::reorder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use sqlx::PgPool;
use uuid::Uuid;

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    /// Converts priority to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    /// Parses priority from its stored form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(TaskPriority::Low),
            "medium" => Some(TaskPriority::Medium),
            "high" => Some(TaskPriority::High),
            _ => None,
        }
    }
}

/// Task row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,

    /// Column the task sits in
    pub column_id: Uuid,

    pub title: String,

    pub description: Option<String>,

    /// Position among the column's tasks (ascending)
    pub order_index: i32,

    /// Assigned user
    pub assignee_id: Option<Uuid>,

    /// Stored priority ("low", "medium", "high"); see [`Task::get_priority`]
    pub priority: Option<String>,

    /// Start of the window the task should be worked in
    pub task_window_start: Option<DateTime<Utc>>,

    /// Deadline
    pub task_window_deadline: Option<DateTime<Utc>>,

    /// Author
    pub created_by: Option<Uuid>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Gets the parsed priority enum
    pub fn get_priority(&self) -> Option<TaskPriority> {
        self.priority.as_deref().and_then(TaskPriority::parse)
    }

    /// Fields a user edits from the task detail form, for history rows
    fn editable_snapshot(&self) -> JsonValue {
        json!({
            "title": self.title,
            "description": self.description,
            "assignee_id": self.assignee_id,
            "priority": self.priority,
            "task_window_start": self.task_window_start,
            "task_window_deadline": self.task_window_deadline,
        })
    }
}

/// Assignee shown on a task card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: Uuid,
    pub full_name: String,
}

/// Task joined with its assignee's name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskWithAssignee {
    #[serde(flatten)]
    pub task: Task,

    pub assignee: Option<Assignee>,
}

#[derive(sqlx::FromRow)]
struct TaskAssigneeRow {
    #[sqlx(flatten)]
    task: Task,
    assignee_full_name: Option<String>,
}

impl From<TaskAssigneeRow> for TaskWithAssignee {
    fn from(row: TaskAssigneeRow) -> Self {
        let assignee = match (row.task.assignee_id, row.assignee_full_name) {
            (Some(id), Some(full_name)) => Some(Assignee { id, full_name }),
            _ => None,
        };

        TaskWithAssignee {
            task: row.task,
            assignee,
        }
    }
}

/// Input for creating a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub column_id: Uuid,

    pub title: String,

    pub description: Option<String>,

    /// Explicit position; None appends at the tail of the column
    pub order_index: Option<i32>,

    pub assignee_id: Option<Uuid>,

    pub priority: Option<TaskPriority>,

    pub task_window_start: Option<DateTime<Utc>>,

    pub task_window_deadline: Option<DateTime<Utc>>,

    pub created_by: Option<Uuid>,
}

impl CreateTask {
    /// A task with only the required fields set, appended at the tail
    pub fn new(column_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            column_id,
            title: title.into(),
            description: None,
            order_index: None,
            assignee_id: None,
            priority: None,
            task_window_start: None,
            task_window_deadline: None,
            created_by: None,
        }
    }
}

/// Input for updating a task
///
/// Nullable fields use `Some(None)` to clear. Column and position are not
/// editable here; use [`crate::reorder::move_task`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub assignee_id: Option<Option<Uuid>>,
    pub priority: Option<Option<TaskPriority>>,
    pub task_window_start: Option<Option<DateTime<Utc>>>,
    pub task_window_deadline: Option<Option<DateTime<Utc>>>,

    /// Acting user, recorded in the task history
    pub updated_by: Option<Uuid>,
}

impl UpdateTask {
    /// True when no column would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.assignee_id.is_none()
            && self.priority.is_none()
            && self.task_window_start.is_none()
            && self.task_window_deadline.is_none()
    }
}

impl Task {
    /// Creates a task
    ///
    /// Without an explicit `order_index` the task goes to the tail of its
    /// column, computed under a lock on the column row.
    ///
    /// # Errors
    ///
    /// Fails with a foreign-key violation if `column_id` (or `assignee_id`,
    /// `created_by`) does not reference an existing row.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let order_index = match data.order_index {
            Some(index) => index,
            None => {
                // A missing column leaves nothing to lock; the INSERT below
                // then fails on the foreign key.
                reorder::lock_column(&mut tx, data.column_id).await?;
                reorder::tail_task_index(&mut tx, data.column_id, None).await?
            }
        };

        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (column_id, title, description, order_index, assignee_id,
                               priority, task_window_start, task_window_deadline, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, column_id, title, description, order_index, assignee_id, priority,
                      task_window_start, task_window_deadline, created_by, created_at, updated_at
            "#,
        )
        .bind(data.column_id)
        .bind(data.title)
        .bind(data.description)
        .bind(order_index)
        .bind(data.assignee_id)
        .bind(data.priority.map(|p| p.as_str()))
        .bind(data.task_window_start)
        .bind(data.task_window_deadline)
        .bind(data.created_by)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, column_id, title, description, order_index, assignee_id, priority,
                   task_window_start, task_window_deadline, created_by, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists tasks with their assignees, optionally restricted to one column
    ///
    /// Ordered by column, then position.
    pub async fn list(
        pool: &PgPool,
        column_id: Option<Uuid>,
    ) -> Result<Vec<TaskWithAssignee>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TaskAssigneeRow>(
            r#"
            SELECT t.id, t.column_id, t.title, t.description, t.order_index, t.assignee_id,
                   t.priority, t.task_window_start, t.task_window_deadline, t.created_by,
                   t.created_at, t.updated_at,
                   u.full_name AS assignee_full_name
            FROM tasks t
            LEFT JOIN users u ON u.id = t.assignee_id
            WHERE ($1::uuid IS NULL OR t.column_id = $1)
            ORDER BY t.column_id, t.order_index ASC, t.created_at ASC
            "#,
        )
        .bind(column_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(TaskWithAssignee::from).collect())
    }

    /// Lists the tasks of several columns with their assignees
    pub async fn list_by_columns(
        pool: &PgPool,
        column_ids: &[Uuid],
    ) -> Result<Vec<TaskWithAssignee>, sqlx::Error> {
        if column_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, TaskAssigneeRow>(
            r#"
            SELECT t.id, t.column_id, t.title, t.description, t.order_index, t.assignee_id,
                   t.priority, t.task_window_start, t.task_window_deadline, t.created_by,
                   t.created_at, t.updated_at,
                   u.full_name AS assignee_full_name
            FROM tasks t
            LEFT JOIN users u ON u.id = t.assignee_id
            WHERE t.column_id = ANY($1)
            ORDER BY t.order_index ASC, t.created_at ASC
            "#,
        )
        .bind(column_ids)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(TaskWithAssignee::from).collect())
    }

    /// Updates the fields present in `data` and records an `updated` history row
    ///
    /// An update naming no field only refreshes `updated_at` and leaves the
    /// history untouched. Returns None if the task doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let changes_fields = !data.is_empty();
        let mut tx = pool.begin().await?;

        let before = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, column_id, title, description, order_index, assignee_id, priority,
                   task_window_start, task_window_deadline, created_by, created_at, updated_at
            FROM tasks
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(before) = before else {
            return Ok(None);
        };

        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.assignee_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", assignee_id = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.task_window_start.is_some() {
            bind_count += 1;
            query.push_str(&format!(", task_window_start = ${}", bind_count));
        }
        if data.task_window_deadline.is_some() {
            bind_count += 1;
            query.push_str(&format!(", task_window_deadline = ${}", bind_count));
        }

        query.push_str(" WHERE id = $1 RETURNING id, column_id, title, description, order_index, assignee_id, priority, task_window_start, task_window_deadline, created_by, created_at, updated_at");

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(assignee_id) = data.assignee_id {
            q = q.bind(assignee_id);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority.map(|p| p.as_str()));
        }
        if let Some(start) = data.task_window_start {
            q = q.bind(start);
        }
        if let Some(deadline) = data.task_window_deadline {
            q = q.bind(deadline);
        }

        let after = q.fetch_one(&mut *tx).await?;

        if changes_fields {
            TaskHistory::record(
                &mut tx,
                NewTaskHistory {
                    task_id: id,
                    user_id: data.updated_by,
                    action: TaskHistoryAction::Updated,
                    old_value: Some(before.editable_snapshot()),
                    new_value: Some(after.editable_snapshot()),
                },
            )
            .await?;
        }

        tx.commit().await?;

        Ok(Some(after))
    }

    /// Deletes a task
    ///
    /// Its labels, comments and history go with it (CASCADE).
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        Task {
            id: Uuid::new_v4(),
            column_id: Uuid::new_v4(),
            title: "Ship it".to_string(),
            description: None,
            order_index: 0,
            assignee_id: None,
            priority: Some("medium".to_string()),
            task_window_start: None,
            task_window_deadline: None,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_task_priority_as_str() {
        assert_eq!(TaskPriority::Low.as_str(), "low");
        assert_eq!(TaskPriority::Medium.as_str(), "medium");
        assert_eq!(TaskPriority::High.as_str(), "high");
    }

    #[test]
    fn test_task_priority_parse() {
        assert_eq!(TaskPriority::parse("high"), Some(TaskPriority::High));
        assert_eq!(TaskPriority::parse("urgent"), None);
        assert_eq!(TaskPriority::parse("High"), None);
    }

    #[test]
    fn test_get_priority() {
        let mut task = sample_task();
        assert_eq!(task.get_priority(), Some(TaskPriority::Medium));

        task.priority = None;
        assert_eq!(task.get_priority(), None);
    }

    #[test]
    fn test_update_task_default_is_empty() {
        let update = UpdateTask::default();
        assert!(update.is_empty());

        let clear_assignee = UpdateTask {
            assignee_id: Some(None),
            ..Default::default()
        };
        assert!(!clear_assignee.is_empty());
    }

    #[test]
    fn test_create_task_new_appends_at_tail() {
        let column_id = Uuid::new_v4();
        let create = CreateTask::new(column_id, "Triage");
        assert_eq!(create.column_id, column_id);
        assert_eq!(create.title, "Triage");
        assert!(create.order_index.is_none());
        assert!(create.priority.is_none());
    }

    #[test]
    fn test_task_with_assignee_serializes_flat() {
        let mut task = sample_task();
        let assignee_id = Uuid::new_v4();
        task.assignee_id = Some(assignee_id);

        let row = TaskAssigneeRow {
            task,
            assignee_full_name: Some("Grace Hopper".to_string()),
        };
        let value = serde_json::to_value(TaskWithAssignee::from(row)).unwrap();

        assert_eq!(value["title"], "Ship it");
        assert_eq!(value["order_index"], 0);
        assert_eq!(value["assignee"]["full_name"], "Grace Hopper");
        assert_eq!(value["assignee"]["id"], assignee_id.to_string());
    }

    #[test]
    fn test_task_without_assignee_has_null_assignee() {
        let row = TaskAssigneeRow {
            task: sample_task(),
            assignee_full_name: None,
        };
        let value = serde_json::to_value(TaskWithAssignee::from(row)).unwrap();
        assert!(value["assignee"].is_null());
    }

    #[test]
    fn test_editable_snapshot_excludes_position() {
        let snapshot = sample_task().editable_snapshot();
        assert_eq!(snapshot["title"], "Ship it");
        assert!(snapshot.get("order_index").is_none());
        assert!(snapshot.get("column_id").is_none());
    }
}
