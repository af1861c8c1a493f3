//! Entry, stop-loss, target and position size from a fused bias.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::models::plan::{Direction, KeyLevels, TradePlan};
use crate::models::signal::{Bias, FusionResult};

/// Price the target distance is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetAnchor {
    /// `target = entry ± |entry - stop| × rr`; the plan's R:R equals `min_rr_ratio`.
    #[default]
    Entry,
    /// `target = price ± |price - stop| × rr`; R:R then varies with the entry offset.
    CurrentPrice,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskParameters {
    pub risk_per_trade_fraction: f64,
    pub min_rr_ratio: f64,
    pub account_risk_amount: f64,
    #[serde(default)]
    pub target_anchor: TargetAnchor,
}

impl Default for RiskParameters {
    fn default() -> Self {
        Self {
            risk_per_trade_fraction: 0.01,
            min_rr_ratio: 1.5,
            account_risk_amount: 100_000.0,
            target_anchor: TargetAnchor::Entry,
        }
    }
}

/// Whole units affordable for the configured risk. Zero when there is no
/// distance between entry and stop.
pub fn position_size(
    entry: f64,
    stop_loss: f64,
    account_risk_amount: f64,
    risk_per_trade_fraction: f64,
) -> u64 {
    let points_at_risk = (entry - stop_loss).abs();
    if points_at_risk == 0.0 || !points_at_risk.is_finite() {
        return 0;
    }
    let units = (account_risk_amount * risk_per_trade_fraction / points_at_risk).floor();
    if units.is_finite() && units > 0.0 {
        units as u64
    } else {
        0
    }
}

/// Reward over risk. Undefined when entry sits on the stop.
pub fn risk_reward_ratio(entry: f64, stop_loss: f64, target: f64) -> Result<f64> {
    let risk = (entry - stop_loss).abs();
    if risk == 0.0 {
        return Err(EngineError::DivisionUndefined(entry));
    }
    Ok((target - entry).abs() / risk)
}

pub struct TradePlanner;

impl TradePlanner {
    pub fn plan(
        result: &FusionResult,
        current_price: f64,
        levels: &KeyLevels,
        risk: &RiskParameters,
    ) -> Result<TradePlan> {
        if levels.band_upper - levels.band_lower <= 0.0 {
            return Err(EngineError::DegenerateLevels(format!(
                "band width {} <= 0",
                levels.band_upper - levels.band_lower
            )));
        }

        let (direction, entry, stop_loss) = match result.bias {
            Bias::Bullish => (
                Direction::Long,
                current_price.max(levels.ema_fast),
                levels.day_low.min(levels.band_lower),
            ),
            Bias::Bearish => (
                Direction::Short,
                current_price.min(levels.ema_fast),
                levels.day_high.max(levels.band_upper),
            ),
            Bias::Neutral => return Err(EngineError::NeutralBias),
        };

        let anchor = match risk.target_anchor {
            TargetAnchor::Entry => entry,
            TargetAnchor::CurrentPrice => current_price,
        };
        let target = match direction {
            Direction::Long => anchor + (anchor - stop_loss) * risk.min_rr_ratio,
            Direction::Short => anchor - (stop_loss - anchor) * risk.min_rr_ratio,
        };

        let risk_reward_ratio = risk_reward_ratio(entry, stop_loss, target)?;

        Ok(TradePlan {
            direction,
            current_price,
            entry,
            stop_loss,
            target,
            risk_reward_ratio,
            position_size: position_size(
                entry,
                stop_loss,
                risk.account_risk_amount,
                risk.risk_per_trade_fraction,
            ),
            risk_points: (entry - stop_loss).abs(),
            reward_points: (target - entry).abs(),
        })
    }
}
