//! Input validation helpers
//!
//! Centralized limits and checks applied at the HTTP boundary, before a
//! request reaches the order engine. The engine itself assumes validated
//! input (non-empty items, quantities >= 1).

use shared::AppError;
use shared::models::OrderItemInput;

// ── Limits ──────────────────────────────────────────────────────────

/// Idempotency keys are caller-generated tokens (typically UUIDs)
pub const MAX_IDEMPOTENCY_KEY_LEN: usize = 128;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate the line items of an order request: at least one line, every
/// quantity at least 1.
pub fn validate_order_items(items: &[OrderItemInput]) -> Result<(), AppError> {
    if items.is_empty() {
        return Err(AppError::validation("items must not be empty"));
    }
    for item in items {
        if item.quantity < 1 {
            return Err(AppError::validation(format!(
                "quantity for product {} must be at least 1",
                item.product_id
            )));
        }
    }
    Ok(())
}
