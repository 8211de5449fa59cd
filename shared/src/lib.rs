//! Shared types for the Harvest marketplace
//!
//! Common types used across server and client crates: data models,
//! error/response structures, and small utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResponse, AppResult};
pub use serde::{Deserialize, Serialize};
