//! One-shot analysis: evaluate a snapshot file once and print the outcome.
//!
//! Usage: `confluence <snapshot.json>` (falls back to `SNAPSHOT_FILE`).

use chrono::Utc;
use confluence::config::EngineConfig;
use confluence::logging;
use confluence::services::market_data::MarketSnapshot;
use confluence::signals::engine::{CycleOutcome, FusionEngine};
use dotenvy::dotenv;
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let path = env::args()
        .nth(1)
        .or_else(|| env::var("SNAPSHOT_FILE").ok())
        .ok_or("usage: confluence <snapshot.json> (or set SNAPSHOT_FILE)")?;

    let config = EngineConfig::from_env()?;
    let raw = std::fs::read_to_string(&path)?;
    let snapshot: MarketSnapshot = serde_json::from_str(&raw)?;
    let input = snapshot.into_cycle_input(&config.timeframes);

    let engine = FusionEngine::new(config);
    let (tally_bias, tally) = engine.tally(&input.snapshots);
    let report = engine.run_cycle(&input, Utc::now())?;

    println!("Symbol: {}", engine.config().symbol);
    if !report.missing.is_empty() {
        let missing: Vec<String> = report.missing.iter().map(|tf| tf.to_string()).collect();
        println!("Missing timeframes: {}", missing.join(", "));
    }
    for rejected in &report.rejected {
        println!("Rejected: {}", rejected);
    }
    println!(
        "Vote tally: {} ({} bullish / {} bearish)",
        tally_bias, tally.bullish, tally.bearish
    );

    if let Some(result) = report.result() {
        println!(
            "Fused bias: {} (strength {:.2}, score {:.2}, trend {})",
            result.bias, result.strength, result.aggregate_score, result.trend_strength_count
        );
    }

    match &report.outcome {
        CycleOutcome::NoData => println!("No usable snapshots."),
        CycleOutcome::Suppressed { decision, .. } => {
            println!("No alert: {}", serde_json::to_string(decision)?)
        }
        CycleOutcome::NoValidSetup { reason, .. } => println!("No valid setup: {}", reason),
        CycleOutcome::Alert(alert) => {
            println!();
            println!("{}", alert.payload.render());
            println!();
            println!("{}", serde_json::to_string_pretty(&alert.payload)?);
        }
    }

    Ok(())
}
