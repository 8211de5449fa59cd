//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] / [`AppResponse`] - 统一错误和响应 (from shared::error)
//! - 日志、输入验证

pub mod logger;
pub mod validation;

// Re-export error types from shared so server code can use crate::utils::*
pub use shared::error::{AppError, AppResponse, AppResult, ok, ok_with_message};
