//! Repository Module
//!
//! Read-side queries over the SQLite pools. The order write path does
//! not live here: reservation and insertion run inside one transaction
//! in [`crate::orders::OrderService`].

pub mod order;
pub mod user;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

pub type RepoResult<T> = Result<T, RepoError>;
