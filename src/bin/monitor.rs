//! Confluence Monitor
//!
//! Polls indicator snapshots on a fixed cadence, fuses them and delivers
//! alerts. Serves health, metrics and status over HTTP alongside the loop.

use confluence::config::{get_environment, EngineConfig};
use confluence::core::http::{start_server, AppState, HealthStatus};
use confluence::core::runtime::{RuntimeConfig, SignalRuntime};
use confluence::logging;
use confluence::metrics::Metrics;
use confluence::services::commentary::TemplateCommentary;
use confluence::services::delivery::LogSink;
use confluence::services::market_data::{
    JsonFileSnapshotProvider, MarketDataProvider, StaticSnapshotProvider,
};
use confluence::signals::engine::FusionEngine;
use dotenvy::dotenv;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let env = get_environment();
    info!("Starting Confluence Monitor");
    info!(environment = %env, "Environment");

    let engine_config = EngineConfig::from_env()?;
    let runtime_config = RuntimeConfig::from_env()?;

    info!(
        symbol = %engine_config.symbol,
        timeframes = ?engine_config.timeframes,
        threshold = engine_config.min_score_threshold,
        cooldown = engine_config.cooldown_seconds,
        "Engine configured"
    );

    let metrics = Arc::new(Metrics::new()?);

    let provider: Arc<dyn MarketDataProvider> = match &runtime_config.snapshot_file {
        Some(path) => {
            info!(path = %path.display(), "Reading snapshots from file");
            Arc::new(JsonFileSnapshotProvider::new(path.clone()))
        }
        None => {
            warn!("SNAPSHOT_FILE not set - every cycle will report no data");
            Arc::new(StaticSnapshotProvider::default())
        }
    };

    let symbol = engine_config.symbol.clone();
    let engine = Arc::new(FusionEngine::new(engine_config));
    let runtime = SignalRuntime::new(runtime_config.clone(), engine, provider, metrics.clone())
        .with_sink(Arc::new(LogSink))
        .with_commentary(Arc::new(TemplateCommentary));

    let health = Arc::new(RwLock::new(HealthStatus::default()));
    let state = AppState {
        health: health.clone(),
        metrics,
        start_time: Arc::new(Instant::now()),
        last_cycle: runtime.last_cycle(),
        symbol,
    };

    let port = runtime_config.http_port;
    tokio::spawn(async move {
        if let Err(e) = start_server(state, port).await {
            error!(error = %e, "HTTP server stopped");
        }
    });

    if let Err(e) = runtime.run().await {
        health.write().await.status = "unhealthy".to_string();
        error!(error = %e, "Monitor stopped on fatal error");
        return Err(e.into());
    }

    info!("Monitor shut down cleanly");
    Ok(())
}
