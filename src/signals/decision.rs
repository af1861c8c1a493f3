//! Bias classification

use serde::{Deserialize, Serialize};

use crate::models::indicators::{IndicatorSnapshot, ProviderRecommendation};
use crate::models::signal::{Bias, FusionResult};
use crate::signals::aggregation::Aggregate;
use crate::signals::scoring::{ADX_TRENDING, RSI_STRONG, RSI_WEAK};

pub const MAX_STRENGTH: f64 = 5.0;
/// Votes one side needs over the other before the tally leaves neutral.
pub const TALLY_MARGIN: u32 = 2;
const ADX_MODERATE: f64 = 20.0;

pub struct Classifier;

impl Classifier {
    /// Two-valued fused classification. A zero score is bearish.
    pub fn classify(aggregate_score: f64, trend_strength_total: u32) -> FusionResult {
        Self::classify_with_reasons(aggregate_score, trend_strength_total, Vec::new())
    }

    pub fn classify_aggregate(aggregate: Aggregate) -> FusionResult {
        Self::classify_with_reasons(
            aggregate.score,
            aggregate.trend_strength_total,
            aggregate.reasons,
        )
    }

    fn classify_with_reasons(
        aggregate_score: f64,
        trend_strength_total: u32,
        reasons: Vec<String>,
    ) -> FusionResult {
        let bias = if aggregate_score > 0.0 {
            Bias::Bullish
        } else {
            Bias::Bearish
        };

        FusionResult {
            bias,
            strength: bounded_strength(aggregate_score, trend_strength_total),
            trend_strength_count: trend_strength_total,
            aggregate_score,
            reasons,
        }
    }

    /// Three-valued vote count over a single snapshot.
    pub fn classify_tally(snapshot: &IndicatorSnapshot) -> (Bias, SignalTally) {
        let tally = SignalTally::from_snapshot(snapshot);
        (tally.bias(), tally)
    }
}

fn bounded_strength(aggregate_score: f64, trend_strength_total: u32) -> f64 {
    let raw = aggregate_score.abs() + trend_strength_total as f64;
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, MAX_STRENGTH)
}

/// Bullish and bearish votes cast by a single snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalTally {
    pub bullish: u32,
    pub bearish: u32,
}

impl SignalTally {
    pub fn from_snapshot(snapshot: &IndicatorSnapshot) -> Self {
        let mut tally = Self::default();

        if let Some(rsi) = snapshot.rsi {
            if rsi > RSI_STRONG {
                tally.bullish += 1;
            } else if rsi < RSI_WEAK {
                tally.bearish += 1;
            }
        }

        if let (Some(line), Some(signal)) = (snapshot.macd_line, snapshot.macd_signal) {
            if line > signal {
                tally.bullish += 1;
            } else {
                tally.bearish += 1;
            }
        }

        match snapshot.provider_recommendation {
            ProviderRecommendation::StrongBuy | ProviderRecommendation::Buy => tally.bullish += 1,
            ProviderRecommendation::StrongSell | ProviderRecommendation::Sell => {
                tally.bearish += 1
            }
            ProviderRecommendation::Neutral => {}
        }

        tally
    }

    pub fn merge(self, other: SignalTally) -> Self {
        Self {
            bullish: self.bullish + other.bullish,
            bearish: self.bearish + other.bearish,
        }
    }

    pub fn bias(&self) -> Bias {
        if self.bullish > self.bearish + TALLY_MARGIN {
            Bias::Bullish
        } else if self.bearish > self.bullish + TALLY_MARGIN {
            Bias::Bearish
        } else {
            Bias::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendStrengthLabel {
    Strong,
    Moderate,
    Weak,
}

impl TrendStrengthLabel {
    pub fn from_adx(adx: f64) -> Self {
        if adx > ADX_TRENDING {
            TrendStrengthLabel::Strong
        } else if adx > ADX_MODERATE {
            TrendStrengthLabel::Moderate
        } else {
            TrendStrengthLabel::Weak
        }
    }
}
