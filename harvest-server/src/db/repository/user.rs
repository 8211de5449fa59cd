//! User repository
//!
//! The order engine treats users as externally managed; all it ever
//! needs is the existence lookup.

use shared::models::User;
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const USER_COLUMNS: &str = "id, email, name, created_at";

/// Find a user by id, failing with `NotFound` when absent.
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<User> {
    let sql = format!("SELECT {USER_COLUMNS} FROM user WHERE id = ?");
    sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("user {id} not found")))
}
