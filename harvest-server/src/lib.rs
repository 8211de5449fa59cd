//! Harvest Server - 农场直销市集订单服务
//!
//! # 架构概述
//!
//! 本模块是市集服务的主入口，提供以下核心功能：
//!
//! - **订单引擎** (`orders`): 幂等下单、库存预留、价格快照
//! - **数据库** (`db`): SQLite 读写分离连接池与仓储
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! harvest-server/src/
//! ├── core/          # 配置、共享状态
//! ├── api/           # HTTP 路由和处理器
//! ├── orders/        # 订单引擎
//! ├── db/            # 数据库层
//! └── utils/         # 错误、日志、校验
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, ServerState};
pub use orders::{OrderError, OrderService};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::init_logger;
