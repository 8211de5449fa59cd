//! 核心模块
//!
//! - [`config`] - 环境变量配置
//! - [`state`] - 服务器共享状态

pub mod config;
pub mod state;

pub use config::Config;
pub use state::ServerState;
