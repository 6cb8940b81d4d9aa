//! # Taskboard Shared Library
//!
//! Persistence layer for the taskboard API: connection pooling, schema
//! migrations, one model per table, and the task move/reorder operation.
//!
//! ## Module Organization
//!
//! - `db`: Connection pool and migration runner
//! - `models`: Database models and their CRUD operations
//! - `reorder`: Tail-position computation and the atomic task move

pub mod db;
pub mod models;
pub mod reorder;

/// Current version of the taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
