//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`orders`] - 订单接口（创建、详情、历史）

pub mod health;
pub mod orders;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Create the combined router
pub fn create_router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(orders::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
