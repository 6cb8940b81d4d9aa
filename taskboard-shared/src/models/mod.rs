/// Database models for the taskboard
///
/// One module per table, each exposing the row struct, its create/update
/// inputs, and the SQL operations on it.
///
/// # Models
///
/// - `organization`: Top-level grouping of workspaces
/// - `workspace`: Grouping of boards under an organization
/// - `board`: A Kanban board, plus the nested board → columns → tasks view
/// - `column`: Ordered buckets of tasks within a board
/// - `task`: Cards within a column
/// - `task_history`: Append-only audit log of task moves and edits
/// - `user`: Assignees and authors
///
/// # Partial updates
///
/// `Update*` inputs follow one convention: an outer `None` leaves the column
/// untouched. For nullable columns the field is `Option<Option<T>>`, and
/// `Some(None)` clears it. Use [`nullable`] as the serde deserializer for
/// such fields so that an explicit JSON `null` becomes `Some(None)` while an
/// absent key stays `None`.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::organization::{CreateOrganization, Organization};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let org = Organization::create(&pool, CreateOrganization {
///     name: "Acme".to_string(),
///     description: None,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Deserializer};

pub mod board;
pub mod column;
pub mod organization;
pub mod task;
pub mod task_history;
pub mod user;
pub mod workspace;

/// Deserializes a present-but-possibly-null field into `Some(Option<T>)`
///
/// Pair with `#[serde(default)]` so a missing key yields `None`.
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        description: Option<Option<String>>,
    }

    #[test]
    fn test_nullable_distinguishes_absent_null_and_value() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.description, None);

        let cleared: Patch = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));

        let set: Patch = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        assert_eq!(set.description, Some(Some("x".to_string())));
    }
}
