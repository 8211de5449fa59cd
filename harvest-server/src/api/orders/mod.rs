//! Order API Module
//!
//! Creation is idempotent per (user_id, idempotency_key); reads cover
//! single orders and per-user history pages.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/user/{user_id}", get(handler::list_by_user))
}
