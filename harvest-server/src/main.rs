//! harvest-server - 市集订单服务入口

use harvest_server::{Config, ServerState, api, init_logger};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env();

    init_logger(&config.log_level, config.log_dir.as_deref());

    tracing::info!("Starting harvest-server (env: {})", config.environment);

    // Open the database and wire the services
    let state = ServerState::initialize(&config).await?;

    let app = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("harvest-server listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
