//! 订单领域 (Order domain)
//!
//! Order creation, lookup and history. All stock mutation happens here.

pub mod service;

pub use service::{OrderError, OrderService};

use crate::utils::AppError;

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::UserNotFound(id) => AppError::not_found(format!("user {id} not found")),
            OrderError::ProductNotFound(id) => {
                AppError::not_found(format!("product {id} not found"))
            }
            OrderError::OrderNotFound(id) => AppError::not_found(format!("order {id} not found")),
            e @ OrderError::InsufficientStock { .. } => AppError::conflict(e.to_string()),
            OrderError::KeyConflict(cause) => {
                AppError::internal(format!("unresolved idempotency conflict: {cause}"))
            }
            OrderError::Database(cause) => AppError::database(cause),
        }
    }
}
