//! Fusion engine: one synchronous cycle from snapshots to an alert payload.
//!
//! score (per timeframe) → aggregate → classify → gate → plan → compose.
//! The engine performs no I/O; the only state it mutates is the alert gate's.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::alerts::composer::{AlertPayload, KeyIndicators, MessageComposer};
use crate::alerts::gate::{AlertGate, GateDecision};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::models::indicators::{IndicatorSnapshot, SnapshotSet, Timeframe};
use crate::models::plan::{KeyLevels, TradePlan};
use crate::models::signal::{Bias, FusionResult, TimeframeScore, VolumePressure};
use crate::planning::options::suggest_option_trade;
use crate::planning::trade_plan::TradePlanner;
use crate::signals::aggregation::Aggregator;
use crate::signals::decision::{Classifier, SignalTally};
use crate::signals::scoring::Scorer;

/// Everything the data collaborator hands over for one cycle.
#[derive(Debug, Clone, Default)]
pub struct CycleInput {
    pub snapshots: SnapshotSet,
    pub volume_pressure: Option<VolumePressure>,
}

impl CycleInput {
    pub fn new(snapshots: SnapshotSet) -> Self {
        Self {
            snapshots,
            volume_pressure: None,
        }
    }

    pub fn with_volume_pressure(mut self, pressure: VolumePressure) -> Self {
        self.volume_pressure = Some(pressure);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub result: FusionResult,
    pub plan: TradePlan,
    pub payload: AlertPayload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// No configured timeframe produced a usable snapshot.
    NoData,
    Suppressed {
        result: FusionResult,
        decision: GateDecision,
    },
    /// The gate passed but the levels could not support a plan.
    NoValidSetup {
        result: FusionResult,
        reason: EngineError,
    },
    Alert(Box<Alert>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub missing: Vec<Timeframe>,
    pub rejected: Vec<EngineError>,
    pub outcome: CycleOutcome,
}

impl CycleReport {
    pub fn result(&self) -> Option<&FusionResult> {
        match &self.outcome {
            CycleOutcome::NoData => None,
            CycleOutcome::Suppressed { result, .. } | CycleOutcome::NoValidSetup { result, .. } => {
                Some(result)
            }
            CycleOutcome::Alert(alert) => Some(&alert.result),
        }
    }

    pub fn alert(&self) -> Option<&Alert> {
        match &self.outcome {
            CycleOutcome::Alert(alert) => Some(alert),
            _ => None,
        }
    }

    pub fn summary(&self) -> CycleSummary {
        let outcome = match &self.outcome {
            CycleOutcome::NoData => "no_data",
            CycleOutcome::Suppressed { .. } => "suppressed",
            CycleOutcome::NoValidSetup { .. } => "no_valid_setup",
            CycleOutcome::Alert(_) => "alert",
        };
        let result = self.result();
        CycleSummary {
            outcome,
            bias: result.map(|r| r.bias),
            strength: result.map(|r| r.strength),
            trend_strength_count: result.map(|r| r.trend_strength_count),
            missing: self.missing.clone(),
        }
    }
}

/// Serializable digest of a cycle, exposed on the status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleSummary {
    pub outcome: &'static str,
    pub bias: Option<Bias>,
    pub strength: Option<f64>,
    pub trend_strength_count: Option<u32>,
    pub missing: Vec<Timeframe>,
}

/// Snapshots that survived validation, in configured timeframe order.
struct PreparedSnapshots<'a> {
    usable: Vec<&'a IndicatorSnapshot>,
    missing: Vec<Timeframe>,
    rejected: Vec<EngineError>,
}

pub struct FusionEngine {
    config: EngineConfig,
    gate: AlertGate,
    composer: MessageComposer,
}

impl FusionEngine {
    pub fn new(config: EngineConfig) -> Self {
        let gate = AlertGate::new(config.min_score_threshold, config.cooldown());
        let composer = MessageComposer::new(config.symbol.clone(), config.top_reasons);
        Self {
            config,
            gate,
            composer,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Score, aggregate and classify. `None` when no snapshot is usable.
    pub fn fuse(&self, snapshots: &SnapshotSet) -> Option<FusionResult> {
        let prepared = self.prepare(snapshots);
        self.fuse_prepared(&prepared)
    }

    /// Vote-count classification across every usable snapshot; may be neutral.
    pub fn tally(&self, snapshots: &SnapshotSet) -> (Bias, SignalTally) {
        let tally = self
            .prepare(snapshots)
            .usable
            .into_iter()
            .map(SignalTally::from_snapshot)
            .fold(SignalTally::default(), SignalTally::merge);
        (tally.bias(), tally)
    }

    /// Run one full cycle. Only a corrupted gate is returned as an error.
    pub fn run_cycle(&self, input: &CycleInput, now: DateTime<Utc>) -> Result<CycleReport> {
        let prepared = self.prepare(&input.snapshots);
        let missing = prepared.missing.clone();
        let rejected = prepared.rejected.clone();
        let report = |outcome| CycleReport {
            missing: missing.clone(),
            rejected: rejected.clone(),
            outcome,
        };

        let Some(result) = self.fuse_prepared(&prepared) else {
            warn!(symbol = %self.config.symbol, "no usable snapshots this cycle");
            return Ok(report(CycleOutcome::NoData));
        };

        debug!(
            symbol = %self.config.symbol,
            bias = %result.bias,
            strength = result.strength,
            aggregate_score = result.aggregate_score,
            trend_strength = result.trend_strength_count,
            "fused bias"
        );

        let decision = self.gate.evaluate(&result, input.volume_pressure, now)?;
        if !decision.passed() {
            debug!(symbol = %self.config.symbol, decision = ?decision, "alert suppressed");
            return Ok(report(CycleOutcome::Suppressed { result, decision }));
        }

        let Some(primary) = self.primary_snapshot(&prepared) else {
            return Ok(report(CycleOutcome::NoData));
        };

        let plan = match KeyLevels::from_snapshot(primary)
            .ok_or_else(|| {
                EngineError::DegenerateLevels(format!(
                    "{} snapshot lacks bollinger bands or fast EMA",
                    primary.timeframe
                ))
            })
            .and_then(|levels| {
                TradePlanner::plan(&result, primary.close, &levels, &self.config.risk)
            }) {
            Ok(plan) => plan,
            Err(reason) => {
                warn!(symbol = %self.config.symbol, error = %reason, "no valid setup");
                return Ok(report(CycleOutcome::NoValidSetup { result, reason }));
            }
        };

        let mut payload = self.composer.compose(&result, &plan).with_key_indicators(KeyIndicators {
            rsi: primary.rsi,
            adx: primary.adx,
        });
        if let Some(options) = &self.config.options {
            if let Some(idea) = suggest_option_trade(
                primary.close,
                result.bias,
                result.strength,
                options.strike_step,
                options.hedge_width,
            ) {
                payload = payload.with_option_idea(idea);
            }
        }

        info!(
            symbol = %self.config.symbol,
            bias = %result.bias,
            strength = result.strength,
            entry = plan.entry,
            stop_loss = plan.stop_loss,
            target = plan.target,
            position_size = plan.position_size,
            "alert raised"
        );

        Ok(report(CycleOutcome::Alert(Box::new(Alert {
            result,
            plan,
            payload,
        }))))
    }

    fn prepare<'a>(&self, snapshots: &'a SnapshotSet) -> PreparedSnapshots<'a> {
        let mut prepared = PreparedSnapshots {
            usable: Vec::new(),
            missing: Vec::new(),
            rejected: Vec::new(),
        };

        for (i, timeframe) in self.config.timeframes.iter().enumerate() {
            // A timeframe contributes at most once, even from an unvalidated config.
            if self.config.timeframes[..i].contains(timeframe) {
                continue;
            }

            let Some(snapshot) = snapshots.get(timeframe) else {
                debug!(error = %EngineError::MissingTimeframe(*timeframe), "proceeding without timeframe");
                prepared.missing.push(*timeframe);
                continue;
            };

            if let Err(e) = snapshot.validate() {
                warn!(error = %e, "discarding snapshot");
                prepared.rejected.push(e);
                continue;
            }

            for out_of_range in snapshot.out_of_range_oscillators() {
                debug!(error = %out_of_range, "scoring out-of-range oscillator as-is");
            }

            prepared.usable.push(snapshot);
        }

        prepared
    }

    fn fuse_prepared(&self, prepared: &PreparedSnapshots<'_>) -> Option<FusionResult> {
        if prepared.usable.is_empty() {
            return None;
        }

        let scores: Vec<TimeframeScore> = prepared
            .usable
            .iter()
            .map(|snapshot| Scorer::score(snapshot))
            .collect();

        let aggregate = if self.config.renormalize_weights {
            Aggregator::aggregate_renormalized(&scores, &self.config.weights)
        } else {
            Aggregator::aggregate(&scores, &self.config.weights)
        };

        Some(Classifier::classify_aggregate(aggregate))
    }

    fn primary_snapshot<'a>(&self, prepared: &PreparedSnapshots<'a>) -> Option<&'a IndicatorSnapshot> {
        prepared
            .usable
            .iter()
            .copied()
            .find(|s| s.timeframe == self.config.primary_timeframe)
            .or_else(|| prepared.usable.first().copied())
    }
}
