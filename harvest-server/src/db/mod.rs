//! Database Module
//!
//! Handles SQLite connection pools and migrations

pub mod repository;

use shared::AppError;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;

/// How long a writer may wait for the write connection before the request
/// fails with a generic store error.
const WRITE_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Database service, owner of the SQLite connection pools.
///
/// Two pools over the same WAL database file: a read pool for lookups and
/// pagination, and a single-connection write pool. Every order-creating
/// transaction runs on the sole write connection, so concurrent writers
/// queue on pool acquisition (an async wait, not a busy retry) and their
/// effects apply in a strict, non-interleaved sequence. WAL keeps readers
/// unblocked while a write transaction is open.
#[derive(Clone)]
pub struct DbService {
    read_pool: SqlitePool,
    write_pool: SqlitePool,
}

impl DbService {
    /// Open the database (creating file and parent directory if missing)
    /// and run migrations.
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        if let Some(parent) = std::path::Path::new(db_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::database(format!("Failed to create data dir: {e}")))?;
        }

        // WAL, foreign keys, normal sync; busy_timeout applies per
        // connection and covers external writers sharing the file
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON")
            .pragma("busy_timeout", "5000")
            .optimize_on_close(true, None);

        let write_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(WRITE_ACQUIRE_TIMEOUT)
            .connect_with(options.clone())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        let read_pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

        sqlx::migrate!("./migrations")
            .run(&write_pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");

        Ok(Self {
            read_pool,
            write_pool,
        })
    }

    /// Pool for read-side queries.
    pub fn read_pool(&self) -> &SqlitePool {
        &self.read_pool
    }

    /// Single-connection pool owning the write path. Acquiring a
    /// transaction here is the serialization point for order creation.
    pub fn write_pool(&self) -> &SqlitePool {
        &self.write_pool
    }
}
