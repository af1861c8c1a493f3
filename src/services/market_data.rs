//! Market data provider interface.
//!
//! Indicator computation happens upstream; a provider hands the engine
//! finished snapshots for every timeframe it could read this cycle.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::models::indicators::{IndicatorSnapshot, SnapshotSet, Timeframe};
use crate::models::signal::VolumePressure;
use crate::signals::engine::CycleInput;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch the latest snapshot for each requested timeframe.
    ///
    /// Timeframes the provider cannot serve are left out of the returned set;
    /// an error means no data at all was obtained.
    async fn fetch(&self, symbol: &str, timeframes: &[Timeframe]) -> Result<CycleInput>;
}

/// On-disk and wire shape of one poll: a flat list of snapshots plus the
/// optional volume pressure reading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_pressure: Option<VolumePressure>,
    pub snapshots: Vec<IndicatorSnapshot>,
}

impl MarketSnapshot {
    /// Keep only the requested timeframes; a later duplicate replaces an earlier one.
    pub fn into_cycle_input(self, timeframes: &[Timeframe]) -> CycleInput {
        let snapshots: SnapshotSet = self
            .snapshots
            .into_iter()
            .filter(|s| timeframes.contains(&s.timeframe))
            .map(|s| (s.timeframe, s))
            .collect();
        CycleInput {
            snapshots,
            volume_pressure: self.volume_pressure,
        }
    }
}

/// In-memory provider whose contents are replaced by the caller.
#[derive(Default)]
pub struct StaticSnapshotProvider {
    current: RwLock<MarketSnapshot>,
}

impl StaticSnapshotProvider {
    pub fn new(snapshot: MarketSnapshot) -> Self {
        Self {
            current: RwLock::new(snapshot),
        }
    }

    pub async fn update(&self, snapshot: MarketSnapshot) {
        *self.current.write().await = snapshot;
    }
}

#[async_trait]
impl MarketDataProvider for StaticSnapshotProvider {
    async fn fetch(&self, _symbol: &str, timeframes: &[Timeframe]) -> Result<CycleInput> {
        let snapshot = self.current.read().await.clone();
        Ok(snapshot.into_cycle_input(timeframes))
    }
}

/// Re-reads a JSON [`MarketSnapshot`] from disk on every fetch, so an external
/// process can keep the file current.
pub struct JsonFileSnapshotProvider {
    path: PathBuf,
}

impl JsonFileSnapshotProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl MarketDataProvider for JsonFileSnapshotProvider {
    async fn fetch(&self, symbol: &str, timeframes: &[Timeframe]) -> Result<CycleInput> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            EngineError::DataUnavailable(format!("{}: {}", self.path.display(), e))
        })?;
        let snapshot: MarketSnapshot = serde_json::from_str(&raw).map_err(|e| {
            EngineError::DataUnavailable(format!("{}: {}", self.path.display(), e))
        })?;
        debug!(
            symbol = %symbol,
            path = %self.path.display(),
            count = snapshot.snapshots.len(),
            "loaded snapshots from file"
        );
        Ok(snapshot.into_cycle_input(timeframes))
    }
}
