use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::indicators::Timeframe;

/// Score and explanation for a single timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeScore {
    pub timeframe: Timeframe,
    pub score: f64,
    /// 1 when ADX reported a trending market on this timeframe, else 0.
    pub trend_strength: u32,
    pub reasons: Vec<String>,
}

impl TimeframeScore {
    pub fn new(timeframe: Timeframe) -> Self {
        Self {
            timeframe,
            score: 0.0,
            trend_strength: 0,
            reasons: Vec::new(),
        }
    }

    /// Add a contribution and its tagged reason.
    pub fn push(&mut self, delta: f64, reason: impl AsRef<str>) {
        self.score += delta;
        self.reasons
            .push(format!("{} {}", self.timeframe.tag(), reason.as_ref()));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for Bias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Bias::Bullish => "bullish",
            Bias::Bearish => "bearish",
            Bias::Neutral => "neutral",
        };
        f.write_str(label)
    }
}

/// Which side of the tape volume is leaning on, as reported by the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumePressure {
    Buying,
    Selling,
    Neutral,
}

impl VolumePressure {
    pub fn confirms(&self, bias: Bias) -> bool {
        matches!(
            (self, bias),
            (VolumePressure::Buying, Bias::Bullish) | (VolumePressure::Selling, Bias::Bearish)
        )
    }
}

/// Fused directional view for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionResult {
    pub bias: Bias,
    /// Bounded confidence in [0, 5].
    pub strength: f64,
    pub trend_strength_count: u32,
    pub aggregate_score: f64,
    pub reasons: Vec<String>,
}

impl FusionResult {
    pub fn is_directional(&self) -> bool {
        self.bias != Bias::Neutral
    }
}
