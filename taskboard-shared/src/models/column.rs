/// Column model and database operations
///
/// Columns are the ordered buckets of a board ("To Do", "Doing", "Done").
///
/// # Schema
///
/// ```sql
/// CREATE TABLE columns (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     board_id UUID NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     order_index INTEGER NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use crate::reorder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Column row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Column {
    pub id: Uuid,

    /// Board the column belongs to
    pub board_id: Uuid,

    pub title: String,

    /// Position among the board's columns (ascending)
    pub order_index: i32,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateColumn {
    pub board_id: Uuid,

    pub title: String,

    /// Explicit position; None appends after the board's last column
    pub order_index: Option<i32>,
}

/// Input for updating a column
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateColumn {
    pub title: Option<String>,
    pub order_index: Option<i32>,
}

impl Column {
    /// Creates a column
    ///
    /// Without an explicit `order_index` the column is appended after the
    /// board's last column, under a lock on the board row.
    ///
    /// # Errors
    ///
    /// Fails with a foreign-key violation if `board_id` does not exist.
    pub async fn create(pool: &PgPool, data: CreateColumn) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let order_index = match data.order_index {
            Some(index) => index,
            None => {
                reorder::lock_board(&mut tx, data.board_id).await?;
                reorder::tail_column_index(&mut tx, data.board_id).await?
            }
        };

        let column = sqlx::query_as::<_, Column>(
            r#"
            INSERT INTO columns (board_id, title, order_index)
            VALUES ($1, $2, $3)
            RETURNING id, board_id, title, order_index, created_at, updated_at
            "#,
        )
        .bind(data.board_id)
        .bind(data.title)
        .bind(order_index)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(column)
    }

    /// Finds a column by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let column = sqlx::query_as::<_, Column>(
            r#"
            SELECT id, board_id, title, order_index, created_at, updated_at
            FROM columns
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(column)
    }

    /// Lists columns, optionally restricted to one board
    ///
    /// Ordered by board, then position.
    pub async fn list(pool: &PgPool, board_id: Option<Uuid>) -> Result<Vec<Self>, sqlx::Error> {
        let columns = sqlx::query_as::<_, Column>(
            r#"
            SELECT id, board_id, title, order_index, created_at, updated_at
            FROM columns
            WHERE ($1::uuid IS NULL OR board_id = $1)
            ORDER BY board_id, order_index ASC
            "#,
        )
        .bind(board_id)
        .fetch_all(pool)
        .await?;

        Ok(columns)
    }

    /// Lists the columns of several boards
    pub async fn list_by_boards(pool: &PgPool, board_ids: &[Uuid]) -> Result<Vec<Self>, sqlx::Error> {
        if board_ids.is_empty() {
            return Ok(Vec::new());
        }

        let columns = sqlx::query_as::<_, Column>(
            r#"
            SELECT id, board_id, title, order_index, created_at, updated_at
            FROM columns
            WHERE board_id = ANY($1)
            ORDER BY board_id, order_index ASC
            "#,
        )
        .bind(board_ids)
        .fetch_all(pool)
        .await?;

        Ok(columns)
    }

    /// Updates the fields present in `data`
    ///
    /// Returns None if the column doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateColumn,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE columns SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.order_index.is_some() {
            bind_count += 1;
            query.push_str(&format!(", order_index = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, board_id, title, order_index, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Column>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(order_index) = data.order_index {
            q = q.bind(order_index);
        }

        let column = q.fetch_optional(pool).await?;

        Ok(column)
    }

    /// Deletes a column
    ///
    /// ⚠️  Cascades to its tasks.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM columns WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_column_default() {
        let update = UpdateColumn::default();
        assert!(update.title.is_none());
        assert!(update.order_index.is_none());
    }
}
