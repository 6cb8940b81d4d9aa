/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `organizations`: Organizations and their workspaces
/// - `workspaces`: Workspace management
/// - `boards`: Boards, including the nested board view
/// - `columns`: Column management
/// - `tasks`: Task management, moves and history
/// - `users`: User management and assignee lookup

pub mod boards;
pub mod columns;
pub mod health;
pub mod organizations;
pub mod tasks;
pub mod users;
pub mod workspaces;

use std::borrow::Cow;
use validator::ValidationError;

/// Rejects names and titles made only of whitespace
///
/// `length(min = 1)` counts characters, so `"   "` would pass it.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some(Cow::Borrowed("Must not be blank"));
        return Err(error);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("Sprint").is_ok());
        assert!(not_blank("  padded  ").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("\t\n").is_err());
    }
}
