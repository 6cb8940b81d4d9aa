/// Board model and database operations
///
/// A board belongs to a workspace and holds an ordered list of columns.
/// Besides plain CRUD this module assembles the nested view the board page
/// renders: each board with its columns, each column with its tasks, each
/// task with its assignee.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE boards (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     workspace_id UUID NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     created_by UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use crate::models::column::Column;
use crate::models::task::{Task, TaskWithAssignee};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Board row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Board {
    pub id: Uuid,

    /// Workspace the board belongs to
    pub workspace_id: Uuid,

    pub name: String,

    pub description: Option<String>,

    pub created_by: Option<Uuid>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Column with its tasks in display order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnWithTasks {
    #[serde(flatten)]
    pub column: Column,

    pub tasks: Vec<TaskWithAssignee>,
}

/// Board with its columns in display order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardWithColumns {
    #[serde(flatten)]
    pub board: Board,

    pub columns: Vec<ColumnWithTasks>,
}

/// Input for creating a board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBoard {
    pub workspace_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<Uuid>,
}

/// Input for updating a board
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBoard {
    pub name: Option<String>,

    /// Use Some(None) to clear
    pub description: Option<Option<String>>,
}

impl Board {
    /// Inserts a new board
    ///
    /// # Errors
    ///
    /// Fails with a foreign-key violation if `workspace_id` does not exist.
    pub async fn create(pool: &PgPool, data: CreateBoard) -> Result<Self, sqlx::Error> {
        let board = sqlx::query_as::<_, Board>(
            r#"
            INSERT INTO boards (workspace_id, name, description, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id, workspace_id, name, description, created_by, created_at, updated_at
            "#,
        )
        .bind(data.workspace_id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.created_by)
        .fetch_one(pool)
        .await?;

        Ok(board)
    }

    /// Finds a board by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let board = sqlx::query_as::<_, Board>(
            r#"
            SELECT id, workspace_id, name, description, created_by, created_at, updated_at
            FROM boards
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(board)
    }

    /// Lists boards, optionally restricted to one workspace, oldest first
    pub async fn list(pool: &PgPool, workspace_id: Option<Uuid>) -> Result<Vec<Self>, sqlx::Error> {
        let boards = sqlx::query_as::<_, Board>(
            r#"
            SELECT id, workspace_id, name, description, created_by, created_at, updated_at
            FROM boards
            WHERE ($1::uuid IS NULL OR workspace_id = $1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(workspace_id)
        .fetch_all(pool)
        .await?;

        Ok(boards)
    }

    /// Lists boards with their columns and tasks
    ///
    /// Three queries (boards, their columns, those columns' tasks) stitched
    /// together in memory.
    pub async fn list_with_columns(
        pool: &PgPool,
        workspace_id: Option<Uuid>,
    ) -> Result<Vec<BoardWithColumns>, sqlx::Error> {
        let boards = Self::list(pool, workspace_id).await?;

        let board_ids: Vec<Uuid> = boards.iter().map(|b| b.id).collect();
        let columns = Column::list_by_boards(pool, &board_ids).await?;

        let column_ids: Vec<Uuid> = columns.iter().map(|c| c.id).collect();
        let tasks = Task::list_by_columns(pool, &column_ids).await?;

        Ok(assemble(boards, columns, tasks))
    }

    /// Updates the fields present in `data`
    ///
    /// Returns None if the board doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateBoard,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE boards SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }

        query.push_str(" WHERE id = $1 RETURNING id, workspace_id, name, description, created_by, created_at, updated_at");

        let mut q = sqlx::query_as::<_, Board>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }

        let board = q.fetch_optional(pool).await?;

        Ok(board)
    }

    /// Deletes a board
    ///
    /// ⚠️  Cascades to its columns and tasks.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Groups tasks under columns and columns under boards
///
/// Input order is preserved within each group, so callers pass columns and
/// tasks already sorted by `order_index`.
fn assemble(
    boards: Vec<Board>,
    columns: Vec<Column>,
    tasks: Vec<TaskWithAssignee>,
) -> Vec<BoardWithColumns> {
    let mut tasks_by_column: HashMap<Uuid, Vec<TaskWithAssignee>> = HashMap::new();
    for task in tasks {
        tasks_by_column.entry(task.task.column_id).or_default().push(task);
    }

    let mut columns_by_board: HashMap<Uuid, Vec<ColumnWithTasks>> = HashMap::new();
    for column in columns {
        let tasks = tasks_by_column.remove(&column.id).unwrap_or_default();
        columns_by_board
            .entry(column.board_id)
            .or_default()
            .push(ColumnWithTasks { column, tasks });
    }

    boards
        .into_iter()
        .map(|board| {
            let columns = columns_by_board.remove(&board.id).unwrap_or_default();
            BoardWithColumns { board, columns }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(workspace_id: Uuid) -> Board {
        Board {
            id: Uuid::new_v4(),
            workspace_id,
            name: "Sprint".to_string(),
            description: None,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn column(board_id: Uuid, title: &str, order_index: i32) -> Column {
        Column {
            id: Uuid::new_v4(),
            board_id,
            title: title.to_string(),
            order_index,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn task(column_id: Uuid, title: &str, order_index: i32) -> TaskWithAssignee {
        TaskWithAssignee {
            task: Task {
                id: Uuid::new_v4(),
                column_id,
                title: title.to_string(),
                description: None,
                order_index,
                assignee_id: None,
                priority: None,
                task_window_start: None,
                task_window_deadline: None,
                created_by: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            assignee: None,
        }
    }

    #[test]
    fn test_assemble_nests_and_keeps_order() {
        let workspace_id = Uuid::new_v4();
        let first = board(workspace_id);
        let second = board(workspace_id);

        let todo = column(first.id, "To Do", 0);
        let done = column(first.id, "Done", 1);

        let tasks = vec![
            task(todo.id, "a", 0),
            task(done.id, "c", 0),
            task(todo.id, "b", 1),
        ];

        let (first_id, second_id) = (first.id, second.id);
        let nested = assemble(vec![first, second], vec![todo, done], tasks);

        assert_eq!(nested.len(), 2);
        assert_eq!(nested[0].board.id, first_id);
        assert_eq!(nested[1].board.id, second_id);
        assert!(nested[1].columns.is_empty());

        let columns = &nested[0].columns;
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].column.title, "To Do");
        let titles: Vec<&str> = columns[0].tasks.iter().map(|t| t.task.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
        assert_eq!(columns[1].tasks.len(), 1);
    }

    #[test]
    fn test_board_with_columns_serializes_flat() {
        let b = board(Uuid::new_v4());
        let nested = BoardWithColumns {
            board: b,
            columns: Vec::new(),
        };

        let value = serde_json::to_value(&nested).unwrap();
        assert_eq!(value["name"], "Sprint");
        assert!(value["columns"].as_array().unwrap().is_empty());
    }
}
