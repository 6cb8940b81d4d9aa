/// Workspace model and database operations
///
/// A workspace groups boards under an organization.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE workspaces (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
///     name TEXT NOT NULL,
///     description TEXT,
///     icon TEXT,
///     created_by UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Deleting a workspace removes its boards, their columns and their tasks
/// through the `ON DELETE CASCADE` chain; nothing is deleted in Rust.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Workspace row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Workspace {
    pub id: Uuid,

    /// Owning organization
    pub organization_id: Uuid,

    pub name: String,

    pub description: Option<String>,

    /// Icon identifier chosen in the sidebar (emoji or icon name)
    pub icon: Option<String>,

    /// User who created the workspace (null if unknown or deleted)
    pub created_by: Option<Uuid>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a workspace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkspace {
    pub organization_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub created_by: Option<Uuid>,
}

/// Input for updating a workspace
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWorkspace {
    /// Move the workspace to another organization
    pub organization_id: Option<Uuid>,

    pub name: Option<String>,

    /// Use Some(None) to clear
    pub description: Option<Option<String>>,

    /// Use Some(None) to clear
    pub icon: Option<Option<String>>,
}

impl Workspace {
    /// Inserts a new workspace
    ///
    /// # Errors
    ///
    /// Fails with a foreign-key violation if `organization_id` does not exist.
    pub async fn create(pool: &PgPool, data: CreateWorkspace) -> Result<Self, sqlx::Error> {
        let workspace = sqlx::query_as::<_, Workspace>(
            r#"
            INSERT INTO workspaces (organization_id, name, description, icon, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, organization_id, name, description, icon, created_by,
                      created_at, updated_at
            "#,
        )
        .bind(data.organization_id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.icon)
        .bind(data.created_by)
        .fetch_one(pool)
        .await?;

        Ok(workspace)
    }

    /// Finds a workspace by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let workspace = sqlx::query_as::<_, Workspace>(
            r#"
            SELECT id, organization_id, name, description, icon, created_by,
                   created_at, updated_at
            FROM workspaces
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(workspace)
    }

    /// Lists every workspace, ordered by name
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let workspaces = sqlx::query_as::<_, Workspace>(
            r#"
            SELECT id, organization_id, name, description, icon, created_by,
                   created_at, updated_at
            FROM workspaces
            ORDER BY name ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(workspaces)
    }

    /// Lists the workspaces of one organization, oldest first
    pub async fn list_by_organization(
        pool: &PgPool,
        organization_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let workspaces = sqlx::query_as::<_, Workspace>(
            r#"
            SELECT id, organization_id, name, description, icon, created_by,
                   created_at, updated_at
            FROM workspaces
            WHERE organization_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await?;

        Ok(workspaces)
    }

    /// Updates the fields present in `data`
    ///
    /// Returns None if the workspace doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateWorkspace,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE workspaces SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.organization_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", organization_id = ${}", bind_count));
        }
        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.icon.is_some() {
            bind_count += 1;
            query.push_str(&format!(", icon = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, organization_id, name, description, icon, created_by, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Workspace>(&query).bind(id);

        if let Some(organization_id) = data.organization_id {
            q = q.bind(organization_id);
        }
        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(icon) = data.icon {
            q = q.bind(icon);
        }

        let workspace = q.fetch_optional(pool).await?;

        Ok(workspace)
    }

    /// Deletes a workspace
    ///
    /// ⚠️  Cascades to its boards, columns and tasks.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workspaces WHERE id = $1")
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
    fn test_update_workspace_default() {
        let update = UpdateWorkspace::default();
        assert!(update.organization_id.is_none());
        assert!(update.name.is_none());
        assert!(update.description.is_none());
        assert!(update.icon.is_none());
    }
}
