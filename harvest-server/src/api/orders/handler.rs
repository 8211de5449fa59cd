//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use shared::models::{CreateOrderRequest, Order, OrderPage};

use crate::core::ServerState;
use crate::utils::validation::{
    MAX_IDEMPOTENCY_KEY_LEN, validate_order_items, validate_required_text,
};
use crate::utils::{AppResponse, AppResult, ok};

/// Query params for order history pages
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// `created_at` of the last order on the previous page
    pub cursor: Option<i64>,
    pub limit: Option<i64>,
}

/// POST /api/orders - 创建订单（幂等）
///
/// Replays of an already-used key answer 201 with the original order.
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<AppResponse<Order>>)> {
    validate_required_text(
        &payload.idempotency_key,
        "idempotency_key",
        MAX_IDEMPOTENCY_KEY_LEN,
    )?;
    validate_order_items(&payload.items)?;

    let order = state
        .orders
        .create_order(payload.user_id, &payload.idempotency_key, &payload.items)
        .await?;

    Ok((StatusCode::CREATED, ok(order)))
}

/// GET /api/orders/{id} - 获取订单详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.get_order(id).await?;
    Ok(ok(order))
}

/// GET /api/orders/user/{user_id} - 用户订单历史（键集分页）
///
/// Unknown users answer 404, same as the create path.
pub async fn list_by_user(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<AppResponse<OrderPage>>> {
    let page = state
        .orders
        .list_orders_by_user(user_id, query.cursor, query.limit)
        .await?;
    Ok(ok(page))
}
