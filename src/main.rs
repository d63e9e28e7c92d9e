use inventory_api::{app, config, database, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let config = config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting inventory API in {:?} mode", config.environment);

    let pool = database::connect(&config.database.url, config.database.max_connections).await?;

    let app = app(AppState { pool });

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("inventory API listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
