use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::indicators::IndicatorSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => f.write_str("LONG"),
            Direction::Short => f.write_str("SHORT"),
        }
    }
}

/// Price levels a trade plan is anchored on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyLevels {
    pub day_high: f64,
    pub day_low: f64,
    pub band_upper: f64,
    pub band_lower: f64,
    pub ema_fast: f64,
}

impl KeyLevels {
    /// Levels from a snapshot; `None` when bands or the fast EMA are missing.
    pub fn from_snapshot(snapshot: &IndicatorSnapshot) -> Option<Self> {
        Some(Self {
            day_high: snapshot.high,
            day_low: snapshot.low,
            band_upper: snapshot.bb_upper?,
            band_lower: snapshot.bb_lower?,
            ema_fast: snapshot.ema_fast?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradePlan {
    pub direction: Direction,
    pub current_price: f64,
    pub entry: f64,
    pub stop_loss: f64,
    pub target: f64,
    pub risk_reward_ratio: f64,
    pub position_size: u64,
    /// |entry - stop_loss|
    pub risk_points: f64,
    /// |target - entry|
    pub reward_points: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OptionType {
    Call,
    Put,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionStrategy {
    SingleLegBuy,
    DebitSpread,
}

/// At-the-money strike idea derived from the fused bias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSuggestion {
    pub option_type: OptionType,
    pub strategy: OptionStrategy,
    pub atm_strike: f64,
    pub hedge_strike: f64,
}

impl OptionSuggestion {
    pub fn describe(&self) -> String {
        let kind = match self.option_type {
            OptionType::Call => "CALL",
            OptionType::Put => "PUT",
        };
        match self.strategy {
            OptionStrategy::SingleLegBuy => format!("Buy {:.0} {}", self.atm_strike, kind),
            OptionStrategy::DebitSpread => format!(
                "Buy {:.0} {} & Sell {:.0} {}",
                self.atm_strike, kind, self.hedge_strike, kind
            ),
        }
    }
}
