//! Order creation engine
//!
//! The only component that writes orders or mutates stock. Creation runs
//! as one write transaction: lock the requested products, validate
//! activity and stock, snapshot prices, decrement stock, insert the order
//! and its line items. Duplicate submissions are resolved by idempotency
//! key twice: a fast-path read before the transaction, and a recovery
//! read when the unique constraint reports a lost race.

use shared::models::{Order, OrderItem, OrderItemInput, OrderPage, OrderStatus};
use shared::util::now_millis;
use thiserror::Error;

use crate::db::DbService;
use crate::db::repository::{self, RepoError};

/// Default page size for order history listings
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// Hard cap on requested page size
pub const MAX_PAGE_SIZE: i64 = 100;

/// Errors produced by the order engine
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("user {0} not found")]
    UserNotFound(i64),

    /// Unknown and inactive products are deliberately indistinguishable
    #[error("product {0} not found")]
    ProductNotFound(i64),

    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: i64,
        requested: i64,
        available: i64,
    },

    #[error("order {0} not found")]
    OrderNotFound(i64),

    /// Internal signal: the (user_id, idempotency_key) constraint fired
    /// because a concurrent request with the same key committed first.
    /// Resolved inside [`OrderService::create_order`]; never escapes it.
    #[error("idempotency key conflict: {0}")]
    KeyConflict(String),

    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            return OrderError::KeyConflict(db_err.to_string());
        }
        OrderError::Database(err.to_string())
    }
}

impl From<RepoError> for OrderError {
    fn from(err: RepoError) -> Self {
        OrderError::Database(err.to_string())
    }
}

/// Product fields captured under the write transaction, used for
/// validation and snapshot building.
#[derive(Debug, sqlx::FromRow)]
struct LockedProduct {
    id: i64,
    name: String,
    price_cents: i64,
    stock: i64,
    is_active: bool,
    farm_name: String,
}

/// One validated line with its snapshot fields
struct LineSnapshot {
    product_id: i64,
    product_name: String,
    unit_price_cents: i64,
    farm_name: String,
    quantity: i64,
    line_total_cents: i64,
}

/// Order service: sequences idempotency resolution, the reservation
/// transaction and race recovery. Cheap to clone.
#[derive(Clone)]
pub struct OrderService {
    db: DbService,
}

impl OrderService {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    /// Existence guard shared by the create and list entry points.
    async fn verify_user(&self, user_id: i64) -> Result<(), OrderError> {
        repository::user::find_by_id(self.db.read_pool(), user_id)
            .await
            .map(|_| ())
            .map_err(|e| match e {
                RepoError::NotFound(_) => OrderError::UserNotFound(user_id),
                other => OrderError::Database(other.to_string()),
            })
    }

    /// Create an order, or return the existing one when this
    /// `(user_id, idempotency_key)` was already used. Duplicate
    /// submissions are not errors, so caller retry-on-timeout is safe.
    pub async fn create_order(
        &self,
        user_id: i64,
        idempotency_key: &str,
        items: &[OrderItemInput],
    ) -> Result<Order, OrderError> {
        self.verify_user(user_id).await?;

        // Fast path: this logical order already exists
        if let Some(existing) = self.find_existing(user_id, idempotency_key).await? {
            tracing::debug!(
                order_id = existing.id,
                user_id,
                "duplicate submission, returning existing order"
            );
            return Ok(existing);
        }

        match self.reserve_and_insert(user_id, idempotency_key, items).await {
            Ok(order) => {
                tracing::info!(
                    order_id = order.id,
                    user_id,
                    total_cents = order.total_cents,
                    "order created"
                );
                Ok(order)
            }
            // A concurrent request with the same key committed between our
            // pre-check and insert; the constraint adjudicated the race.
            // Return what it created, exactly as a plain duplicate would.
            Err(OrderError::KeyConflict(cause)) => {
                tracing::warn!(
                    user_id,
                    idempotency_key,
                    "idempotency race lost, returning winner's order"
                );
                match self.find_existing(user_id, idempotency_key).await? {
                    Some(existing) => Ok(existing),
                    None => Err(OrderError::Database(cause)),
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Idempotency resolver: the order previously created for this
    /// `(user_id, idempotency_key)`, items included. Pure read.
    pub async fn find_existing(
        &self,
        user_id: i64,
        idempotency_key: &str,
    ) -> Result<Option<Order>, OrderError> {
        Ok(repository::order::find_by_idempotency_key(
            self.db.read_pool(),
            user_id,
            idempotency_key,
        )
        .await?)
    }

    /// Plain read: one order with its items.
    pub async fn get_order(&self, order_id: i64) -> Result<Order, OrderError> {
        repository::order::find_by_id(self.db.read_pool(), order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))
    }

    /// Keyset page of a user's orders, newest first, line items attached.
    /// `cursor` is the `created_at` of the last order of the previous
    /// page. An unknown user is an error, not an empty page.
    pub async fn list_orders_by_user(
        &self,
        user_id: i64,
        cursor: Option<i64>,
        limit: Option<i64>,
    ) -> Result<OrderPage, OrderError> {
        self.verify_user(user_id).await?;

        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let (orders, next_cursor) =
            repository::order::find_page_by_user(self.db.read_pool(), user_id, cursor, limit)
                .await?;
        Ok(OrderPage {
            orders,
            next_cursor,
        })
    }

    /// The reservation transaction. Acquiring the sole write connection is
    /// the blocking point that serializes competing orders; rollback on
    /// every failure path is guaranteed by the transaction guard.
    ///
    /// Input is assumed validated upstream: at least one line, every
    /// quantity >= 1.
    async fn reserve_and_insert(
        &self,
        user_id: i64,
        idempotency_key: &str,
        items: &[OrderItemInput],
    ) -> Result<Order, OrderError> {
        let mut tx = self.db.write_pool().begin().await?;

        // Distinct product ids, first-seen order kept so the missing-id
        // report below is deterministic.
        let mut distinct_ids: Vec<i64> = Vec::new();
        for item in items {
            if !distinct_ids.contains(&item.product_id) {
                distinct_ids.push(item.product_id);
            }
        }

        // One combined read of every requested product inside the write
        // transaction; per-item reads would admit lock-ordering races on
        // stores with row locks.
        let placeholders = vec!["?"; distinct_ids.len()].join(", ");
        let sql = format!(
            "SELECT p.id, p.name, p.price_cents, p.stock, p.is_active, f.name AS farm_name \
             FROM product p JOIN farm f ON f.id = p.farm_id \
             WHERE p.id IN ({placeholders})"
        );
        let mut query = sqlx::query_as::<_, LockedProduct>(&sql);
        for id in &distinct_ids {
            query = query.bind(id);
        }
        let products = query.fetch_all(&mut *tx).await?;

        // Existence first: a missing product is reported before any stock
        // problem of an earlier line.
        if let Some(missing) = distinct_ids
            .iter()
            .find(|id| !products.iter().any(|p| p.id == **id))
        {
            tracing::debug!(product_id = *missing, "rejecting order: product missing");
            return Err(OrderError::ProductNotFound(*missing));
        }

        // Validate lines in request order; the first failure decides the
        // error and nothing is applied. Availability counts what earlier
        // lines of the same product already claimed, so the per-product
        // decrement below can never push stock negative.
        let mut lines: Vec<LineSnapshot> = Vec::with_capacity(items.len());
        let mut total_cents: i64 = 0;
        for (idx, item) in items.iter().enumerate() {
            let Some(product) = products.iter().find(|p| p.id == item.product_id) else {
                return Err(OrderError::ProductNotFound(item.product_id));
            };
            if !product.is_active {
                tracing::debug!(product_id = product.id, "rejecting order: product inactive");
                return Err(OrderError::ProductNotFound(product.id));
            }

            let claimed: i64 = items[..idx]
                .iter()
                .filter(|earlier| earlier.product_id == item.product_id)
                .map(|earlier| earlier.quantity)
                .sum();
            let available = product.stock - claimed;
            if available < item.quantity {
                tracing::debug!(
                    product_id = product.id,
                    requested = item.quantity,
                    available,
                    "rejecting order: insufficient stock"
                );
                return Err(OrderError::InsufficientStock {
                    product_id: product.id,
                    requested: item.quantity,
                    available,
                });
            }

            let line_total_cents = product.price_cents * item.quantity;
            total_cents += line_total_cents;
            lines.push(LineSnapshot {
                product_id: product.id,
                product_name: product.name.clone(),
                unit_price_cents: product.price_cents,
                farm_name: product.farm_name.clone(),
                quantity: item.quantity,
                line_total_cents,
            });
        }

        // One decrement per distinct product, by the summed quantity of
        // its lines.
        let now = now_millis();
        for product_id in &distinct_ids {
            let quantity: i64 = items
                .iter()
                .filter(|item| item.product_id == *product_id)
                .map(|item| item.quantity)
                .sum();
            sqlx::query("UPDATE product SET stock = stock - ?, updated_at = ? WHERE id = ?")
                .bind(quantity)
                .bind(now)
                .bind(product_id)
                .execute(&mut *tx)
                .await?;
        }

        // The unique (user_id, idempotency_key) constraint fires here when
        // a same-key race was lost; From<sqlx::Error> turns it into
        // KeyConflict for the orchestrator to resolve.
        let status = OrderStatus::Pending;
        let order_id: i64 = sqlx::query_scalar(
            "INSERT INTO orders (user_id, idempotency_key, status, total_cents, created_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(user_id)
        .bind(idempotency_key)
        .bind(status)
        .bind(total_cents)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        let mut order_items = Vec::with_capacity(lines.len());
        for line in lines {
            let item_id: i64 = sqlx::query_scalar(
                "INSERT INTO order_item \
                 (order_id, product_id, product_name, unit_price_cents, farm_name, quantity, line_total_cents) \
                 VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(&line.product_name)
            .bind(line.unit_price_cents)
            .bind(&line.farm_name)
            .bind(line.quantity)
            .bind(line.line_total_cents)
            .fetch_one(&mut *tx)
            .await?;

            order_items.push(OrderItem {
                id: item_id,
                order_id,
                product_id: line.product_id,
                product_name: line.product_name,
                unit_price_cents: line.unit_price_cents,
                farm_name: line.farm_name,
                quantity: line.quantity,
                line_total_cents: line.line_total_cents,
            });
        }

        tx.commit().await?;

        Ok(Order {
            id: order_id,
            user_id,
            idempotency_key: idempotency_key.to_string(),
            status,
            total_cents,
            created_at: now,
            items: order_items,
        })
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;

    /// Service over a file-backed database so both pools see one store.
    /// The TempDir must stay alive for the duration of the test.
    async fn test_service() -> (OrderService, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("orders-test.db");
        let db = DbService::new(path.to_str().expect("utf-8 temp path"))
            .await
            .expect("open test database");
        (OrderService::new(db), dir)
    }

    async fn seed_farm(pool: &SqlitePool, id: i64, name: &str) {
        sqlx::query("INSERT INTO farm (id, name, created_at) VALUES (?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(1_700_000_000_000_i64)
            .execute(pool)
            .await
            .expect("seed farm");
    }

    async fn seed_user(pool: &SqlitePool, id: i64, email: &str) {
        sqlx::query("INSERT INTO user (id, email, name, created_at) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(email)
            .bind("Test Buyer")
            .bind(1_700_000_000_000_i64)
            .execute(pool)
            .await
            .expect("seed user");
    }

    async fn seed_product(
        pool: &SqlitePool,
        id: i64,
        farm_id: i64,
        name: &str,
        price_cents: i64,
        stock: i64,
        is_active: bool,
    ) {
        sqlx::query(
            "INSERT INTO product (id, farm_id, name, price_cents, stock, is_active, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(farm_id)
        .bind(name)
        .bind(price_cents)
        .bind(stock)
        .bind(is_active)
        .bind(1_700_000_000_000_i64)
        .bind(1_700_000_000_000_i64)
        .execute(pool)
        .await
        .expect("seed product");
    }

    async fn seed_order_row(
        pool: &SqlitePool,
        id: i64,
        user_id: i64,
        key: &str,
        total_cents: i64,
        created_at: i64,
    ) {
        sqlx::query(
            "INSERT INTO orders (id, user_id, idempotency_key, status, total_cents, created_at) \
             VALUES (?, ?, ?, 'PENDING', ?, ?)",
        )
        .bind(id)
        .bind(user_id)
        .bind(key)
        .bind(total_cents)
        .bind(created_at)
        .execute(pool)
        .await
        .expect("seed order row");
    }

    /// One farm, one buyer, eggs (stock 20) and honey (stock 5).
    async fn seed_catalog(svc: &OrderService) {
        let pool = svc.db.write_pool();
        seed_farm(pool, 1, "Willow Creek").await;
        seed_user(pool, 1, "ana@example.com").await;
        seed_product(pool, 10, 1, "Eggs (dozen)", 450, 20, true).await;
        seed_product(pool, 11, 1, "Honey 500g", 900, 5, true).await;
    }

    async fn stock_of(pool: &SqlitePool, product_id: i64) -> i64 {
        sqlx::query_scalar("SELECT stock FROM product WHERE id = ?")
            .bind(product_id)
            .fetch_one(pool)
            .await
            .expect("read stock")
    }

    async fn order_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(pool)
            .await
            .expect("count orders")
    }

    async fn item_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM order_item")
            .fetch_one(pool)
            .await
            .expect("count order items")
    }

    fn line(product_id: i64, quantity: i64) -> OrderItemInput {
        OrderItemInput {
            product_id,
            quantity,
        }
    }

    #[tokio::test]
    async fn create_order_snapshots_lines_and_decrements_stock() {
        let (svc, _dir) = test_service().await;
        seed_catalog(&svc).await;

        let order = svc
            .create_order(1, "key-1", &[line(10, 2), line(11, 1)])
            .await
            .expect("create order");

        assert_eq!(order.user_id, 1);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_cents, 2 * 450 + 900);
        assert_eq!(order.items.len(), 2);

        let eggs = &order.items[0];
        assert_eq!(eggs.order_id, order.id);
        assert_eq!(eggs.product_id, 10);
        assert_eq!(eggs.product_name, "Eggs (dozen)");
        assert_eq!(eggs.unit_price_cents, 450);
        assert_eq!(eggs.farm_name, "Willow Creek");
        assert_eq!(eggs.quantity, 2);
        assert_eq!(eggs.line_total_cents, 900);

        assert_eq!(stock_of(svc.db.write_pool(), 10).await, 18);
        assert_eq!(stock_of(svc.db.write_pool(), 11).await, 4);
    }

    #[tokio::test]
    async fn repeated_key_returns_existing_order_without_new_reservation() {
        let (svc, _dir) = test_service().await;
        seed_catalog(&svc).await;

        let first = svc
            .create_order(1, "key-dup", &[line(10, 2)])
            .await
            .expect("first submission");
        let second = svc
            .create_order(1, "key-dup", &[line(10, 2)])
            .await
            .expect("second submission");

        assert_eq!(second.id, first.id);
        assert_eq!(second.total_cents, first.total_cents);
        assert_eq!(second.items.len(), 1);
        assert_eq!(order_count(svc.db.write_pool()).await, 1);
        // Stock moved once, not twice
        assert_eq!(stock_of(svc.db.write_pool(), 10).await, 18);
    }

    #[tokio::test]
    async fn same_key_for_another_user_creates_a_separate_order() {
        let (svc, _dir) = test_service().await;
        seed_catalog(&svc).await;
        seed_user(svc.db.write_pool(), 2, "bo@example.com").await;

        let ana = svc
            .create_order(1, "shared-key", &[line(10, 1)])
            .await
            .expect("ana's order");
        let bo = svc
            .create_order(2, "shared-key", &[line(10, 1)])
            .await
            .expect("bo's order");

        assert_ne!(ana.id, bo.id);
        assert_eq!(order_count(svc.db.write_pool()).await, 2);
        assert_eq!(stock_of(svc.db.write_pool(), 10).await, 18);
    }

    #[tokio::test]
    async fn unknown_product_fails_and_persists_nothing() {
        let (svc, _dir) = test_service().await;
        seed_catalog(&svc).await;

        let err = svc
            .create_order(1, "key-2", &[line(10, 1), line(999, 1)])
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::ProductNotFound(999)));
        assert_eq!(order_count(svc.db.write_pool()).await, 0);
        assert_eq!(stock_of(svc.db.write_pool(), 10).await, 20);
    }

    #[tokio::test]
    async fn inactive_product_reads_as_not_found() {
        let (svc, _dir) = test_service().await;
        seed_catalog(&svc).await;
        seed_product(svc.db.write_pool(), 12, 1, "Retired jam", 600, 8, false).await;

        let err = svc
            .create_order(1, "key-3", &[line(12, 1)])
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::ProductNotFound(12)));
        assert_eq!(stock_of(svc.db.write_pool(), 12).await, 8);
    }

    #[tokio::test]
    async fn insufficient_stock_reports_requested_and_available() {
        let (svc, _dir) = test_service().await;
        seed_catalog(&svc).await;

        let err = svc
            .create_order(1, "key-4", &[line(11, 6)])
            .await
            .unwrap_err();

        match err {
            OrderError::InsufficientStock {
                product_id,
                requested,
                available,
            } => {
                assert_eq!(product_id, 11);
                assert_eq!(requested, 6);
                assert_eq!(available, 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(stock_of(svc.db.write_pool(), 11).await, 5);
        assert_eq!(order_count(svc.db.write_pool()).await, 0);
    }

    #[tokio::test]
    async fn failing_line_rolls_back_the_whole_order() {
        let (svc, _dir) = test_service().await;
        seed_catalog(&svc).await;

        // First line is satisfiable, second is not
        let err = svc
            .create_order(1, "key-5", &[line(10, 3), line(11, 9)])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            OrderError::InsufficientStock { product_id: 11, .. }
        ));
        assert_eq!(stock_of(svc.db.write_pool(), 10).await, 20);
        assert_eq!(stock_of(svc.db.write_pool(), 11).await, 5);
        assert_eq!(order_count(svc.db.write_pool()).await, 0);
        assert_eq!(item_count(svc.db.write_pool()).await, 0);
    }

    #[tokio::test]
    async fn line_snapshots_survive_later_product_changes() {
        let (svc, _dir) = test_service().await;
        seed_catalog(&svc).await;

        let order = svc
            .create_order(1, "key-6", &[line(10, 1)])
            .await
            .expect("create order");

        sqlx::query("UPDATE product SET name = ?, price_cents = ? WHERE id = ?")
            .bind("Eggs (large)")
            .bind(999)
            .bind(10)
            .execute(svc.db.write_pool())
            .await
            .expect("reprice product");

        let reread = svc.get_order(order.id).await.expect("reread order");
        assert_eq!(reread.items[0].product_name, "Eggs (dozen)");
        assert_eq!(reread.items[0].unit_price_cents, 450);
        assert_eq!(reread.total_cents, 450);
    }

    #[tokio::test]
    async fn duplicate_lines_combine_into_one_decrement() {
        let (svc, _dir) = test_service().await;
        seed_catalog(&svc).await;

        let order = svc
            .create_order(1, "key-7", &[line(11, 2), line(11, 3)])
            .await
            .expect("create order");

        assert_eq!(order.items.len(), 2);
        assert_eq!(order.total_cents, 5 * 900);
        assert_eq!(stock_of(svc.db.write_pool(), 11).await, 0);
    }

    #[tokio::test]
    async fn duplicate_lines_see_stock_claimed_by_earlier_lines() {
        let (svc, _dir) = test_service().await;
        seed_catalog(&svc).await;

        // Honey has 5 in stock; the first line claims 3, leaving 2
        let err = svc
            .create_order(1, "key-8", &[line(11, 3), line(11, 3)])
            .await
            .unwrap_err();

        match err {
            OrderError::InsufficientStock {
                product_id,
                requested,
                available,
            } => {
                assert_eq!(product_id, 11);
                assert_eq!(requested, 3);
                assert_eq!(available, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(stock_of(svc.db.write_pool(), 11).await, 5);
    }

    #[tokio::test]
    async fn missing_product_outranks_earlier_stock_failure() {
        let (svc, _dir) = test_service().await;
        seed_catalog(&svc).await;

        // Eggs can't satisfy 25 either, but the unknown id decides
        let err = svc
            .create_order(1, "key-9", &[line(10, 25), line(999, 1)])
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::ProductNotFound(999)));
    }

    #[tokio::test]
    async fn unknown_user_is_rejected_before_any_reservation() {
        let (svc, _dir) = test_service().await;
        seed_catalog(&svc).await;

        let err = svc
            .create_order(77, "key-10", &[line(10, 1)])
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::UserNotFound(77)));
        assert_eq!(stock_of(svc.db.write_pool(), 10).await, 20);
    }

    #[tokio::test]
    async fn get_order_unknown_id_is_not_found() {
        let (svc, _dir) = test_service().await;
        seed_catalog(&svc).await;

        let err = svc.get_order(123).await.unwrap_err();
        assert!(matches!(err, OrderError::OrderNotFound(123)));
    }

    #[tokio::test]
    async fn list_orders_clamps_limit_and_walks_newest_first() {
        let (svc, _dir) = test_service().await;
        seed_catalog(&svc).await;
        let pool = svc.db.write_pool();
        seed_order_row(pool, 500, 1, "k-a", 100, 1_000).await;
        seed_order_row(pool, 501, 1, "k-b", 200, 2_000).await;
        seed_order_row(pool, 502, 1, "k-c", 300, 3_000).await;

        // limit 0 clamps up to 1
        let page = svc
            .list_orders_by_user(1, None, Some(0))
            .await
            .expect("first page");
        assert_eq!(page.orders.len(), 1);
        assert_eq!(page.orders[0].id, 502);
        assert_eq!(page.next_cursor, Some(3_000));

        let rest = svc
            .list_orders_by_user(1, page.next_cursor, None)
            .await
            .expect("second page");
        assert_eq!(rest.orders.len(), 2);
        assert_eq!(rest.orders[0].id, 501);
        assert_eq!(rest.next_cursor, None);
    }

    #[tokio::test]
    async fn listing_orders_for_unknown_user_is_rejected() {
        let (svc, _dir) = test_service().await;
        seed_catalog(&svc).await;

        let err = svc.list_orders_by_user(42, None, None).await.unwrap_err();
        assert!(matches!(err, OrderError::UserNotFound(42)));
    }

    #[tokio::test]
    async fn listed_orders_carry_their_line_items() {
        let (svc, _dir) = test_service().await;
        seed_catalog(&svc).await;

        let created = svc
            .create_order(1, "key-11", &[line(10, 2), line(11, 1)])
            .await
            .expect("create order");

        let page = svc
            .list_orders_by_user(1, None, None)
            .await
            .expect("list orders");

        assert_eq!(page.orders.len(), 1);
        let listed = &page.orders[0];
        assert_eq!(listed.id, created.id);
        assert_eq!(listed.items.len(), 2);
        assert_eq!(listed.items[0].product_name, "Eggs (dozen)");
        assert_eq!(listed.items[0].quantity, 2);
        assert_eq!(listed.items[1].line_total_cents, 900);
    }

    #[tokio::test]
    async fn lost_key_race_rolls_back_reservation_and_reports_conflict() {
        let (svc, _dir) = test_service().await;
        seed_catalog(&svc).await;

        svc.create_order(1, "key-race", &[line(10, 1)])
            .await
            .expect("winner");

        // Drive the transaction straight into the unique constraint, as a
        // request that lost the race after its pre-check would.
        let err = svc
            .reserve_and_insert(1, "key-race", &[line(10, 1)])
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::KeyConflict(_)));
        // The loser's decrement rolled back with its insert
        assert_eq!(stock_of(svc.db.write_pool(), 10).await, 19);
        assert_eq!(order_count(svc.db.write_pool()).await, 1);
    }
}
