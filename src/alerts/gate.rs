//! Alert gate: score threshold plus cooldown.
//!
//! The gate owns the only long-lived mutable state in the engine. Reading the
//! last alert time, comparing against the cooldown and recording a new alert
//! all happen under one lock, so at most one alert passes per cooldown window
//! no matter how many callers race.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Mutex;

use crate::error::{EngineError, Result};
use crate::models::signal::{FusionResult, VolumePressure};

pub const DEFAULT_MIN_SCORE_THRESHOLD: f64 = 3.0;
pub const DEFAULT_COOLDOWN_SECONDS: i64 = 300;
/// Trend-strength count at which the gate awards its bonus point.
pub const TREND_CONFIRMATION_COUNT: u32 = 2;

#[derive(Debug, Clone)]
pub struct AlertGateState {
    last_alert_time: Option<DateTime<Utc>>,
    cooldown: Duration,
    min_score_threshold: f64,
}

/// Outcome of one gate evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    Passed { gate_score: f64 },
    BelowThreshold { gate_score: f64, threshold: f64 },
    CoolingDown { gate_score: f64, remaining_seconds: i64 },
}

impl GateDecision {
    pub fn passed(&self) -> bool {
        matches!(self, GateDecision::Passed { .. })
    }

    pub fn gate_score(&self) -> f64 {
        match self {
            GateDecision::Passed { gate_score }
            | GateDecision::BelowThreshold { gate_score, .. }
            | GateDecision::CoolingDown { gate_score, .. } => *gate_score,
        }
    }
}

#[derive(Debug)]
pub struct AlertGate {
    state: Mutex<AlertGateState>,
}

impl AlertGate {
    pub fn new(min_score_threshold: f64, cooldown: Duration) -> Self {
        Self {
            state: Mutex::new(AlertGateState {
                last_alert_time: None,
                cooldown,
                min_score_threshold,
            }),
        }
    }

    /// Gating score: fused strength plus one point each for confirming volume
    /// pressure and multi-timeframe trend strength.
    pub fn gate_score(result: &FusionResult, volume_pressure: Option<VolumePressure>) -> f64 {
        let mut score = result.strength;
        if volume_pressure.is_some_and(|pressure| pressure.confirms(result.bias)) {
            score += 1.0;
        }
        if result.trend_strength_count >= TREND_CONFIRMATION_COUNT {
            score += 1.0;
        }
        score
    }

    /// Evaluate and, on a pass, record `now` as the last alert time.
    pub fn evaluate(
        &self,
        result: &FusionResult,
        volume_pressure: Option<VolumePressure>,
        now: DateTime<Utc>,
    ) -> Result<GateDecision> {
        let gate_score = Self::gate_score(result, volume_pressure);

        let mut state = self
            .state
            .lock()
            .map_err(|e| EngineError::GateStateCorrupted(e.to_string()))?;

        if gate_score < state.min_score_threshold {
            return Ok(GateDecision::BelowThreshold {
                gate_score,
                threshold: state.min_score_threshold,
            });
        }

        if let Some(last) = state.last_alert_time {
            let elapsed = now - last;
            if elapsed < state.cooldown {
                return Ok(GateDecision::CoolingDown {
                    gate_score,
                    remaining_seconds: (state.cooldown - elapsed).num_seconds(),
                });
            }
        }

        state.last_alert_time = Some(now);
        Ok(GateDecision::Passed { gate_score })
    }

    pub fn should_alert(
        &self,
        result: &FusionResult,
        volume_pressure: Option<VolumePressure>,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        Ok(self.evaluate(result, volume_pressure, now)?.passed())
    }
}

impl Default for AlertGate {
    fn default() -> Self {
        Self::new(
            DEFAULT_MIN_SCORE_THRESHOLD,
            Duration::seconds(DEFAULT_COOLDOWN_SECONDS),
        )
    }
}
