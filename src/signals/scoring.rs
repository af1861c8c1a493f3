//! Per-timeframe scoring
//!
//! Converts one [`IndicatorSnapshot`] into a signed score built from small
//! increments (±0.5 or ±1, ±2 for the provider recommendation), each paired with
//! a reason tagged by its timeframe. Contributions are evaluated in a fixed
//! order so downstream truncation of reasons is deterministic.

use crate::models::indicators::IndicatorSnapshot;
use crate::models::signal::TimeframeScore;

pub const RSI_STRONG: f64 = 60.0;
pub const RSI_WEAK: f64 = 40.0;
pub const BB_OVERBOUGHT: f64 = 0.8;
pub const BB_OVERSOLD: f64 = 0.2;
pub const ADX_TRENDING: f64 = 25.0;
pub const STOCH_UPPER: f64 = 80.0;
pub const STOCH_LOWER: f64 = 20.0;

/// Position of `price` inside the band, 0 at the lower band and 1 at the upper.
/// Undefined when the band has no width.
pub fn bollinger_position(price: f64, lower: f64, upper: f64) -> Option<f64> {
    let width = upper - lower;
    if width <= 0.0 {
        return None;
    }
    Some((price - lower) / width)
}

pub struct Scorer;

impl Scorer {
    /// Score a single snapshot. Never fails; missing indicators are skipped.
    pub fn score(snapshot: &IndicatorSnapshot) -> TimeframeScore {
        let mut result = TimeframeScore::new(snapshot.timeframe);

        Self::score_trend(snapshot, &mut result);
        Self::score_momentum(snapshot, &mut result);
        Self::score_macd(snapshot, &mut result);
        Self::score_bands(snapshot, &mut result);
        Self::score_adx(snapshot, &mut result);
        Self::score_stochastic(snapshot, &mut result);

        let recommendation = snapshot.provider_recommendation;
        result.push(
            recommendation.score(),
            format!("Recommendation: {}", recommendation),
        );

        result
    }

    fn score_trend(snapshot: &IndicatorSnapshot, result: &mut TimeframeScore) {
        let (Some(fast), Some(mid)) = (snapshot.ema_fast, snapshot.ema_mid) else {
            return;
        };
        let close = snapshot.close;
        if close > fast && fast > mid {
            result.push(1.0, "Uptrend (Price > EMA20 > EMA50)");
        } else if close < fast && fast < mid {
            result.push(-1.0, "Downtrend (Price < EMA20 < EMA50)");
        }
    }

    fn score_momentum(snapshot: &IndicatorSnapshot, result: &mut TimeframeScore) {
        let (Some(rsi), Some(prev)) = (snapshot.rsi, snapshot.rsi_prev) else {
            return;
        };
        if rsi > RSI_STRONG && rsi > prev {
            result.push(1.0, format!("Strong RSI with momentum ({:.2})", rsi));
        } else if rsi < RSI_WEAK && rsi < prev {
            result.push(-1.0, format!("Weak RSI with momentum ({:.2})", rsi));
        }
    }

    fn score_macd(snapshot: &IndicatorSnapshot, result: &mut TimeframeScore) {
        let (Some(line), Some(signal)) = (snapshot.macd_line, snapshot.macd_signal) else {
            return;
        };
        if line > signal {
            result.push(1.0, "MACD bullish");
        } else {
            result.push(-1.0, "MACD bearish");
        }
    }

    fn score_bands(snapshot: &IndicatorSnapshot, result: &mut TimeframeScore) {
        let (Some(upper), Some(lower)) = (snapshot.bb_upper, snapshot.bb_lower) else {
            return;
        };
        let Some(position) = bollinger_position(snapshot.close, lower, upper) else {
            return;
        };
        if position > BB_OVERBOUGHT {
            result.push(-0.5, "Overbought (BB)");
        } else if position < BB_OVERSOLD {
            result.push(0.5, "Oversold (BB)");
        }
    }

    fn score_adx(snapshot: &IndicatorSnapshot, result: &mut TimeframeScore) {
        let Some(adx) = snapshot.adx else {
            return;
        };
        if adx <= ADX_TRENDING {
            return;
        }
        result.trend_strength = 1;

        let plus = snapshot.adx_plus.unwrap_or(0.0);
        let minus = snapshot.adx_minus.unwrap_or(0.0);
        if plus > minus {
            result.push(1.0, format!("Strong uptrend (ADX: {:.2})", adx));
        } else {
            result.push(-1.0, format!("Strong downtrend (ADX: {:.2})", adx));
        }
    }

    fn score_stochastic(snapshot: &IndicatorSnapshot, result: &mut TimeframeScore) {
        let (Some(k), Some(d)) = (snapshot.stochastic_k, snapshot.stochastic_d) else {
            return;
        };
        if k > d && k < STOCH_UPPER {
            result.push(0.5, "Stochastic bullish crossover");
        } else if k < d && k > STOCH_LOWER {
            result.push(-0.5, "Stochastic bearish crossover");
        }
    }
}
