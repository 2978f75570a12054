use station_board::board::StationBoard;
use station_board::config::BoardConfig;
use station_board::web::{AppState, create_router};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "Station board failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = BoardConfig::from_env()?;
    let addr = config.listen_addr()?;

    let board = StationBoard::from_config(&config)?;
    info!(
        cache = %config.cache_directory().display(),
        timezone = %board.timezone(),
        data_sources = config.data_sources.len(),
        "Loaded configuration"
    );

    let app = create_router(AppState::new(board));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Station board listening");
    info!("  GET  /health  - Health check");
    info!("  GET  /infos   - Board as JSON (optional ?at=YYYY-MM-DDTHH:MM:SS)");

    axum::serve(listener, app).await?;
    Ok(())
}
