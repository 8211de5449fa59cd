//! Farm Model

use serde::{Deserialize, Serialize};

/// Farm entity (农场)
///
/// Products belong to a farm; the farm name is copied into order item
/// snapshots at purchase time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Farm {
    pub id: i64,
    pub name: String,
    pub created_at: i64,
}
