/// Task move and tail-position computation
///
/// Columns order their tasks, and boards order their columns, with an integer
/// `order_index`. New and moved items are always appended at the tail:
/// `max(order_index) + 1`, or `0` for an empty parent.
///
/// Reading the current maximum and writing the new row is a read-modify-write.
/// Every writer that appends into a parent first takes a `FOR UPDATE` lock on
/// the parent row inside a transaction, so appends into the same column (or
/// board) serialize and never compute the same position.
///
/// Positions are bounded by [`MAX_ORDER_INDEX`]. The `*_order_index_range`
/// CHECK constraints enforce the bound in the database, so a full parent
/// rejects further appends instead of overflowing.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::reorder::{move_task, MoveTask};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, task_id: Uuid, done_column: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let moved = move_task(&pool, MoveTask {
///     task_id,
///     column_id: done_column,
///     user_id: None,
/// }).await?;
/// println!("task now at position {}", moved.order_index);
/// # Ok(())
/// # }
/// ```

use crate::models::task::Task;
use crate::models::task_history::{NewTaskHistory, TaskHistory, TaskHistoryAction};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

/// Errors from [`move_task`]
#[derive(Debug, thiserror::Error)]
pub enum TaskMoveError {
    /// The task to move does not exist
    #[error("Task {0} not found")]
    TaskNotFound(Uuid),

    /// The destination column does not exist
    #[error("Destination column {0} does not exist")]
    ColumnNotFound(Uuid),

    /// The destination column has no position left after its last task
    #[error("Column {0} has no free position at the tail")]
    ColumnFull(Uuid),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Input for moving a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveTask {
    pub task_id: Uuid,

    /// Destination column (may equal the current one)
    pub column_id: Uuid,

    /// Acting user, recorded in the task history
    pub user_id: Option<Uuid>,
}

/// Largest position a task or column may hold
pub const MAX_ORDER_INDEX: i32 = 1_000_000_000;

/// Position that follows `current_max`
///
/// Returns `None` once the next position would pass [`MAX_ORDER_INDEX`].
pub fn next_order_index(current_max: Option<i32>) -> Option<i32> {
    match current_max {
        None => Some(0),
        Some(max) => max.checked_add(1).filter(|next| *next <= MAX_ORDER_INDEX),
    }
}

/// Tail position for storage
///
/// A parent already at the bound yields `MAX_ORDER_INDEX + 1`, which the
/// range CHECK rejects as a constraint violation.
fn tail_or_out_of_range(current_max: Option<i32>) -> i32 {
    next_order_index(current_max).unwrap_or(MAX_ORDER_INDEX + 1)
}

/// Locks a column row for the rest of the transaction
///
/// Returns false if the column does not exist.
pub(crate) async fn lock_column(conn: &mut PgConnection, column_id: Uuid) -> Result<bool, sqlx::Error> {
    let locked: Option<Uuid> = sqlx::query_scalar("SELECT id FROM columns WHERE id = $1 FOR UPDATE")
        .bind(column_id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(locked.is_some())
}

/// Locks a board row for the rest of the transaction
///
/// Returns false if the board does not exist.
pub(crate) async fn lock_board(conn: &mut PgConnection, board_id: Uuid) -> Result<bool, sqlx::Error> {
    let locked: Option<Uuid> = sqlx::query_scalar("SELECT id FROM boards WHERE id = $1 FOR UPDATE")
        .bind(board_id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(locked.is_some())
}

/// Tail position for a task appended to `column_id`
///
/// `exclude` leaves one task out of the maximum, so a task re-appended to its
/// own column is compared only against its siblings.
pub(crate) async fn tail_task_index(
    conn: &mut PgConnection,
    column_id: Uuid,
    exclude: Option<Uuid>,
) -> Result<i32, sqlx::Error> {
    let max: Option<i32> = sqlx::query_scalar(
        r#"
        SELECT MAX(order_index)
        FROM tasks
        WHERE column_id = $1 AND ($2::uuid IS NULL OR id <> $2)
        "#,
    )
    .bind(column_id)
    .bind(exclude)
    .fetch_one(&mut *conn)
    .await?;

    Ok(tail_or_out_of_range(max))
}

/// Tail position for a column appended to `board_id`
pub(crate) async fn tail_column_index(conn: &mut PgConnection, board_id: Uuid) -> Result<i32, sqlx::Error> {
    let max: Option<i32> = sqlx::query_scalar("SELECT MAX(order_index) FROM columns WHERE board_id = $1")
        .bind(board_id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(tail_or_out_of_range(max))
}

/// Moves a task to the tail of a column
///
/// Runs in one transaction:
/// 1. lock the destination column row (missing → [`TaskMoveError::ColumnNotFound`])
/// 2. lock the task row (missing → [`TaskMoveError::TaskNotFound`])
/// 3. compute the tail position among the column's other tasks
///    (past [`MAX_ORDER_INDEX`] → [`TaskMoveError::ColumnFull`])
/// 4. write `column_id`, `order_index` and `updated_at`
/// 5. append a `moved` history entry
///
/// The column is locked before the task, in the same order as a column
/// delete cascading into its tasks, so the two never deadlock.
///
/// Moving a task into the column it already occupies re-appends it behind
/// its siblings; a task that is already last keeps its position.
pub async fn move_task(pool: &PgPool, data: MoveTask) -> Result<Task, TaskMoveError> {
    let mut tx = pool.begin().await?;

    if !lock_column(&mut tx, data.column_id).await? {
        return Err(TaskMoveError::ColumnNotFound(data.column_id));
    }

    let current = sqlx::query_as::<_, Task>(
        r#"
        SELECT id, column_id, title, description, order_index, assignee_id, priority,
               task_window_start, task_window_deadline, created_by, created_at, updated_at
        FROM tasks
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(data.task_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(TaskMoveError::TaskNotFound(data.task_id))?;

    let order_index = tail_task_index(&mut tx, data.column_id, Some(data.task_id)).await?;
    if order_index > MAX_ORDER_INDEX {
        return Err(TaskMoveError::ColumnFull(data.column_id));
    }

    debug!(
        task_id = %data.task_id,
        from_column = %current.column_id,
        to_column = %data.column_id,
        order_index,
        "Computed tail position"
    );

    let moved = sqlx::query_as::<_, Task>(
        r#"
        UPDATE tasks
        SET column_id = $2,
            order_index = $3,
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, column_id, title, description, order_index, assignee_id, priority,
                  task_window_start, task_window_deadline, created_by, created_at, updated_at
        "#,
    )
    .bind(data.task_id)
    .bind(data.column_id)
    .bind(order_index)
    .fetch_one(&mut *tx)
    .await?;

    TaskHistory::record(
        &mut tx,
        NewTaskHistory {
            task_id: moved.id,
            user_id: data.user_id,
            action: TaskHistoryAction::Moved,
            old_value: Some(json!({
                "column_id": current.column_id,
                "order_index": current.order_index,
            })),
            new_value: Some(json!({
                "column_id": moved.column_id,
                "order_index": moved.order_index,
            })),
        },
    )
    .await?;

    tx.commit().await?;

    info!(
        task_id = %moved.id,
        column_id = %moved.column_id,
        order_index = moved.order_index,
        "Task moved"
    );

    Ok(moved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_order_index_empty_column() {
        assert_eq!(next_order_index(None), Some(0));
    }

    #[test]
    fn test_next_order_index_appends_after_max() {
        assert_eq!(next_order_index(Some(2)), Some(3));
        assert_eq!(next_order_index(Some(0)), Some(1));
    }

    #[test]
    fn test_next_order_index_with_gaps() {
        // Deleted tasks leave gaps; only the maximum matters
        assert_eq!(next_order_index(Some(41)), Some(42));
    }

    #[test]
    fn test_next_order_index_stops_at_bound() {
        assert_eq!(next_order_index(Some(MAX_ORDER_INDEX - 1)), Some(MAX_ORDER_INDEX));
        assert_eq!(next_order_index(Some(MAX_ORDER_INDEX)), None);
        assert_eq!(next_order_index(Some(i32::MAX)), None);
    }

    #[test]
    fn test_full_parent_yields_out_of_range_tail() {
        assert_eq!(tail_or_out_of_range(Some(3)), 4);
        assert_eq!(tail_or_out_of_range(Some(i32::MAX)), MAX_ORDER_INDEX + 1);
    }

    #[test]
    fn test_move_error_messages() {
        let id = Uuid::nil();
        assert_eq!(
            TaskMoveError::TaskNotFound(id).to_string(),
            format!("Task {} not found", id)
        );
        assert_eq!(
            TaskMoveError::ColumnNotFound(id).to_string(),
            format!("Destination column {} does not exist", id)
        );
        assert_eq!(
            TaskMoveError::ColumnFull(id).to_string(),
            format!("Column {} has no free position at the tail", id)
        );
    }
}
