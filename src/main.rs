use std::sync::Arc;

use tokio::net::TcpListener;

use nifty_predictor::app;
use nifty_predictor::config::AppConfig;
use nifty_predictor::errors::AppError;
use nifty_predictor::external::YahooChartProvider;
use nifty_predictor::logging::{init_logging, LoggingConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(&LoggingConfig::from_env())?;

    let config = AppConfig::from_env();
    config.validate()?;

    tracing::info!(
        "📊 Tracking {} via {:?} ({} range, {}s timeout)",
        config.instrument_name,
        config.symbols,
        config.history_range,
        config.market_data_timeout.as_secs(),
    );

    let source = Arc::new(YahooChartProvider::new(
        config.market_data_base_url.clone(),
        config.market_data_timeout,
    ));

    let addr = config.socket_addr();
    let app = app::create_app(app::build_state(config, source));

    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        tracing::error!("Failed to bind {}: {}", addr, e);
        AppError::Io(e)
    })?;
    tracing::info!("🚀 Predictor running at http://{}/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Io)?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping");
}
