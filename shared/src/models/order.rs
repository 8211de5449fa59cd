//! Order Models
//!
//! An order and its line items are created together in one transaction
//! and never mutated afterwards. Line items carry point-in-time snapshots
//! of product name, unit price and farm name, so the order stays
//! historically accurate when the catalog changes later.

use serde::{Deserialize, Serialize};

/// Order lifecycle state. Order creation only ever produces `Pending`;
/// later transitions belong to the payment/fulfillment workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
pub enum OrderStatus {
    Pending,
    Paid,
    Cancelled,
}

/// Order entity (订单)
///
/// `(user_id, idempotency_key)` is unique at the store level: resubmitting
/// the same logical order returns the original row instead of creating a
/// second one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub idempotency_key: String,
    pub status: OrderStatus,
    /// Sum of line totals, integer cents
    pub total_cents: i64,
    pub created_at: i64,
    /// Line items; loaded by a separate query wherever orders are read
    #[serde(default)]
    #[cfg_attr(feature = "db", sqlx(skip))]
    pub items: Vec<OrderItem>,
}

/// Order line item with price/name snapshots taken at creation time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    /// Product name at purchase time
    pub product_name: String,
    /// Unit price at purchase time, integer cents
    pub unit_price_cents: i64,
    /// Farm name at purchase time
    pub farm_name: String,
    pub quantity: i64,
    /// `unit_price_cents * quantity`
    pub line_total_cents: i64,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: i64,
    pub idempotency_key: String,
    pub items: Vec<OrderItemInput>,
}

/// One requested line: which product, how many units
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_id: i64,
    pub quantity: i64,
}

/// One keyset page of a user's orders, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    /// `created_at` of the last order in `orders`; absent on the last page
    pub next_cursor: Option<i64>,
}
