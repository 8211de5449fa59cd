//! User Model

use serde::{Deserialize, Serialize};

/// User entity (买家)
///
/// Managed elsewhere; the order engine only ever checks existence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub created_at: i64,
}
