//! 服务器共享状态

use super::Config;
use crate::db::DbService;
use crate::orders::OrderService;
use crate::utils::AppError;

/// Shared server state, cloned into every handler
#[derive(Clone)]
pub struct ServerState {
    /// Database pools (pooled reads, serialized writes)
    pub db: DbService,
    /// Order engine
    pub orders: OrderService,
}

impl ServerState {
    /// Open the database, run migrations and wire up the services
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_path).await?;
        let orders = OrderService::new(db.clone());
        Ok(Self { db, orders })
    }
}
