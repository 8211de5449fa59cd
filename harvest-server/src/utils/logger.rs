//! Logging Infrastructure
//!
//! Structured logging setup with optional rolling file output.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize the logger.
///
/// `RUST_LOG` takes precedence; otherwise `log_level` applies to this
/// crate and tower-http stays at info. When `log_dir` is set (and the
/// directory exists) output goes to a daily-rolling file instead of
/// stdout.
pub fn init_logger(log_level: &str, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("harvest_server={log_level},tower_http=info")));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if let Some(dir) = log_dir
        && Path::new(dir).exists()
    {
        let file_appender = tracing_appender::rolling::daily(dir, "harvest-server");
        subscriber.with_writer(file_appender).init();
        return;
    }

    subscriber.init();
}
