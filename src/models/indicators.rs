use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{EngineError, Result};

/// Sampling interval a snapshot was computed on.
///
/// Ordering follows importance in the default weighting (short first), which is
/// also the order reasons are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    #[serde(alias = "5m")]
    Short,
    #[serde(alias = "15m")]
    Medium,
    #[serde(alias = "1h")]
    Long,
}

impl Timeframe {
    pub const ALL: [Timeframe; 3] = [Timeframe::Short, Timeframe::Medium, Timeframe::Long];

    /// Interval tag used to prefix reasons.
    pub fn tag(&self) -> &'static str {
        match self {
            Timeframe::Short => "5m",
            Timeframe::Medium => "15m",
            Timeframe::Long => "1h",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Timeframe {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" | "5m" => Ok(Timeframe::Short),
            "medium" | "15m" => Ok(Timeframe::Medium),
            "long" | "1h" => Ok(Timeframe::Long),
            other => Err(EngineError::Config(format!("unknown timeframe '{}'", other))),
        }
    }
}

/// Summary recommendation published by the indicator provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderRecommendation {
    #[serde(alias = "STRONG_BUY")]
    StrongBuy,
    #[serde(alias = "BUY")]
    Buy,
    #[default]
    #[serde(alias = "NEUTRAL")]
    Neutral,
    #[serde(alias = "SELL")]
    Sell,
    #[serde(alias = "STRONG_SELL")]
    StrongSell,
}

impl ProviderRecommendation {
    pub fn score(&self) -> f64 {
        match self {
            ProviderRecommendation::StrongBuy => 2.0,
            ProviderRecommendation::Buy => 1.0,
            ProviderRecommendation::Neutral => 0.0,
            ProviderRecommendation::Sell => -1.0,
            ProviderRecommendation::StrongSell => -2.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderRecommendation::StrongBuy => "STRONG_BUY",
            ProviderRecommendation::Buy => "BUY",
            ProviderRecommendation::Neutral => "NEUTRAL",
            ProviderRecommendation::Sell => "SELL",
            ProviderRecommendation::StrongSell => "STRONG_SELL",
        }
    }
}

impl fmt::Display for ProviderRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized read of one timeframe at one instant.
///
/// Price fields are mandatory. Every indicator is optional: an absent value
/// simply contributes nothing when scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub timeframe: Timeframe,
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi_prev: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stochastic_k: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stochastic_d: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ema_fast: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ema_mid: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ema_slow: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd_line: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd_signal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adx_plus: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adx_minus: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bb_upper: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bb_middle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bb_lower: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atr: Option<f64>,

    #[serde(default)]
    pub provider_recommendation: ProviderRecommendation,
}

/// One poll's worth of snapshots, keyed (and therefore ordered) by timeframe.
pub type SnapshotSet = BTreeMap<Timeframe, IndicatorSnapshot>;

impl IndicatorSnapshot {
    pub fn new(
        timeframe: Timeframe,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timeframe,
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            rsi: None,
            rsi_prev: None,
            stochastic_k: None,
            stochastic_d: None,
            ema_fast: None,
            ema_mid: None,
            ema_slow: None,
            macd_line: None,
            macd_signal: None,
            adx: None,
            adx_plus: None,
            adx_minus: None,
            bb_upper: None,
            bb_middle: None,
            bb_lower: None,
            atr: None,
            provider_recommendation: ProviderRecommendation::Neutral,
        }
    }

    pub fn with_rsi(mut self, rsi: f64, rsi_prev: f64) -> Self {
        self.rsi = Some(rsi);
        self.rsi_prev = Some(rsi_prev);
        self
    }

    pub fn with_stochastic(mut self, k: f64, d: f64) -> Self {
        self.stochastic_k = Some(k);
        self.stochastic_d = Some(d);
        self
    }

    pub fn with_emas(mut self, fast: f64, mid: f64, slow: f64) -> Self {
        self.ema_fast = Some(fast);
        self.ema_mid = Some(mid);
        self.ema_slow = Some(slow);
        self
    }

    pub fn with_macd(mut self, line: f64, signal: f64) -> Self {
        self.macd_line = Some(line);
        self.macd_signal = Some(signal);
        self
    }

    pub fn with_adx(mut self, adx: f64, plus_di: f64, minus_di: f64) -> Self {
        self.adx = Some(adx);
        self.adx_plus = Some(plus_di);
        self.adx_minus = Some(minus_di);
        self
    }

    pub fn with_bollinger(mut self, upper: f64, middle: f64, lower: f64) -> Self {
        self.bb_upper = Some(upper);
        self.bb_middle = Some(middle);
        self.bb_lower = Some(lower);
        self
    }

    pub fn with_atr(mut self, atr: f64) -> Self {
        self.atr = Some(atr);
        self
    }

    pub fn with_recommendation(mut self, recommendation: ProviderRecommendation) -> Self {
        self.provider_recommendation = recommendation;
        self
    }

    /// Structural checks on price data and band ordering.
    ///
    /// Oscillator ranges are deliberately not checked here; see
    /// [`IndicatorSnapshot::out_of_range_oscillators`].
    pub fn validate(&self) -> Result<()> {
        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ];
        for (name, value) in prices {
            if !value.is_finite() || value < 0.0 {
                return Err(self.invalid(format!("{} must be finite and non-negative, got {}", name, value)));
            }
        }

        if self.high < self.low {
            return Err(self.invalid(format!("high {} below low {}", self.high, self.low)));
        }

        if let (Some(upper), Some(middle), Some(lower)) = (self.bb_upper, self.bb_middle, self.bb_lower) {
            if !(lower <= middle && middle <= upper) {
                return Err(self.invalid(format!(
                    "bollinger bands out of order: lower {} middle {} upper {}",
                    lower, middle, upper
                )));
            }
        }

        Ok(())
    }

    /// Oscillators outside 0..=100. These are reported, never rejected.
    pub fn out_of_range_oscillators(&self) -> Vec<EngineError> {
        let oscillators = [
            ("rsi", self.rsi),
            ("rsi_prev", self.rsi_prev),
            ("stochastic_k", self.stochastic_k),
            ("stochastic_d", self.stochastic_d),
        ];
        oscillators
            .into_iter()
            .filter_map(|(indicator, value)| {
                let value = value?;
                (!(0.0..=100.0).contains(&value)).then_some(EngineError::OutOfRangeIndicator {
                    timeframe: self.timeframe,
                    indicator,
                    value,
                })
            })
            .collect()
    }

    fn invalid(&self, reason: String) -> EngineError {
        EngineError::InvalidSnapshot {
            timeframe: self.timeframe,
            reason,
        }
    }
}
