//! Repository Module
//!
//! CRUD operations over the SQLite pool. Free functions taking
//! `&SqlitePool`, one module per table. All mutation of shared state goes
//! through these operations; handlers never run ad-hoc SQL.

pub mod admin_user;
pub mod menu;
pub mod order;
pub mod site_config;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
