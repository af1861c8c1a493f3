//! Unit tests for market data providers

use confluence::error::EngineError;
use confluence::models::indicators::Timeframe;
use confluence::models::signal::VolumePressure;
use confluence::services::market_data::{
    JsonFileSnapshotProvider, MarketDataProvider, MarketSnapshot, StaticSnapshotProvider,
};

use crate::fixtures::{bearish, bullish};

#[tokio::test]
async fn static_provider_filters_requested_timeframes() {
    let provider = StaticSnapshotProvider::new(MarketSnapshot {
        volume_pressure: Some(VolumePressure::Buying),
        snapshots: vec![bullish(Timeframe::Short), bullish(Timeframe::Long)],
    });

    let input = provider
        .fetch("NIFTY", &[Timeframe::Short, Timeframe::Medium])
        .await
        .unwrap();
    assert_eq!(input.snapshots.len(), 1);
    assert!(input.snapshots.contains_key(&Timeframe::Short));
    assert_eq!(input.volume_pressure, Some(VolumePressure::Buying));
}

#[tokio::test]
async fn static_provider_serves_latest_update() {
    let provider = StaticSnapshotProvider::default();
    assert!(provider
        .fetch("NIFTY", &Timeframe::ALL)
        .await
        .unwrap()
        .snapshots
        .is_empty());

    provider
        .update(MarketSnapshot {
            volume_pressure: None,
            snapshots: vec![bearish(Timeframe::Medium)],
        })
        .await;
    let input = provider.fetch("NIFTY", &Timeframe::ALL).await.unwrap();
    assert_eq!(input.snapshots[&Timeframe::Medium], bearish(Timeframe::Medium));
}

#[test]
fn later_duplicate_timeframe_wins() {
    let mut second = bullish(Timeframe::Short);
    second.close = 101.0;
    let input = MarketSnapshot {
        volume_pressure: None,
        snapshots: vec![bullish(Timeframe::Short), second],
    }
    .into_cycle_input(&Timeframe::ALL);
    assert_eq!(input.snapshots[&Timeframe::Short].close, 101.0);
}

#[tokio::test]
async fn json_file_provider_reads_snapshot_file() {
    let path = std::env::temp_dir().join(format!("confluence-snapshot-{}.json", std::process::id()));
    let snapshot = MarketSnapshot {
        volume_pressure: Some(VolumePressure::Selling),
        snapshots: vec![bearish(Timeframe::Short), bearish(Timeframe::Long)],
    };
    std::fs::write(&path, serde_json::to_string(&snapshot).unwrap()).unwrap();

    let provider = JsonFileSnapshotProvider::new(&path);
    let input = provider.fetch("NIFTY", &Timeframe::ALL).await.unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(input.snapshots.len(), 2);
    assert_eq!(input.volume_pressure, Some(VolumePressure::Selling));
    assert_eq!(input.snapshots[&Timeframe::Long], bearish(Timeframe::Long));
}

#[tokio::test]
async fn missing_file_is_data_unavailable() {
    let provider = JsonFileSnapshotProvider::new("/nonexistent/confluence/snapshot.json");
    let err = provider.fetch("NIFTY", &Timeframe::ALL).await.unwrap_err();
    assert!(matches!(err, EngineError::DataUnavailable(_)));
}
