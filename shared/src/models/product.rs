//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity (商品)
///
/// `stock` is the live sellable quantity; it is decremented only inside
/// the order reservation transaction and never goes negative (also
/// enforced by a CHECK constraint). `price_cents` is the unit price in
/// minor currency units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub farm_id: i64,
    pub name: String,
    pub price_cents: i64,
    pub stock: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}
