//! Order repository - read-side queries
//!
//! Serves the idempotency resolver and the plain read endpoints. The
//! write path (stock reservation + insert) lives in
//! [`crate::orders::OrderService`].

use shared::models::{Order, OrderItem};
use sqlx::SqlitePool;

use super::RepoResult;

const ORDER_COLUMNS: &str = "id, user_id, idempotency_key, status, total_cents, created_at";
const ITEM_COLUMNS: &str =
    "id, order_id, product_id, product_name, unit_price_cents, farm_name, quantity, line_total_cents";

/// Find an order by primary id, line items attached.
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match order {
        Some(mut order) => {
            order.items = load_items(pool, order.id).await?;
            Ok(Some(order))
        }
        None => Ok(None),
    }
}

/// Find the order previously created for `(user_id, idempotency_key)`,
/// line items attached. This is the idempotency resolver's query; the
/// unique constraint guarantees at most one row.
pub async fn find_by_idempotency_key(
    pool: &SqlitePool,
    user_id: i64,
    idempotency_key: &str,
) -> RepoResult<Option<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ? AND idempotency_key = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(user_id)
        .bind(idempotency_key)
        .fetch_optional(pool)
        .await?;

    match order {
        Some(mut order) => {
            order.items = load_items(pool, order.id).await?;
            Ok(Some(order))
        }
        None => Ok(None),
    }
}

/// One keyset page of a user's orders, newest first, line items attached.
///
/// Fetches `limit + 1` rows to detect a further page; the extra row is
/// trimmed and the cursor is the `created_at` of the last returned order.
/// `id DESC` breaks creation-time ties for a stable order within a page.
pub async fn find_page_by_user(
    pool: &SqlitePool,
    user_id: i64,
    cursor: Option<i64>,
    limit: i64,
) -> RepoResult<(Vec<Order>, Option<i64>)> {
    let sql = match cursor {
        Some(_) => format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE user_id = ? AND created_at < ? \
             ORDER BY created_at DESC, id DESC LIMIT ?"
        ),
        None => format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE user_id = ? \
             ORDER BY created_at DESC, id DESC LIMIT ?"
        ),
    };

    let mut query = sqlx::query_as::<_, Order>(&sql).bind(user_id);
    if let Some(cursor) = cursor {
        query = query.bind(cursor);
    }
    let mut orders = query.bind(limit + 1).fetch_all(pool).await?;

    let next_cursor = if orders.len() as i64 > limit {
        orders.truncate(limit as usize);
        orders.last().map(|o| o.created_at)
    } else {
        None
    };

    // Attach after the trim, so the extra row never costs an item query
    for order in &mut orders {
        order.items = load_items(pool, order.id).await?;
    }

    Ok((orders, next_cursor))
}

/// Load the line items of one order, in insertion order.
pub async fn load_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let sql = format!("SELECT {ITEM_COLUMNS} FROM order_item WHERE order_id = ? ORDER BY id");
    Ok(sqlx::query_as::<_, OrderItem>(&sql)
        .bind(order_id)
        .fetch_all(pool)
        .await?)
}
