//! Engine configuration
//!
//! Values come from the process environment (after `dotenvy` has loaded any
//! `.env` file). Every option has a default, so an empty environment yields a
//! working NIFTY setup.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use tracing::warn;

use crate::alerts::composer::DEFAULT_TOP_REASONS;
use crate::alerts::gate::{DEFAULT_COOLDOWN_SECONDS, DEFAULT_MIN_SCORE_THRESHOLD};
use crate::error::{EngineError, Result};
use crate::models::indicators::Timeframe;
use crate::planning::options::{DEFAULT_HEDGE_WIDTH, DEFAULT_STRIKE_STEP};
use crate::planning::trade_plan::{RiskParameters, TargetAnchor};
use crate::signals::weights::TimeframeWeights;

/// Deployment environment name (`APP_ENV`, defaults to `sandbox`).
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
pub fn env_or<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| EngineError::Config(format!("{} has an invalid value '{}'", key, raw))),
        _ => Ok(default),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionsConfig {
    pub strike_step: f64,
    pub hedge_width: f64,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            strike_step: DEFAULT_STRIKE_STEP,
            hedge_width: DEFAULT_HEDGE_WIDTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub symbol: String,
    /// Timeframes expected every cycle, in aggregation order.
    pub timeframes: Vec<Timeframe>,
    /// Timeframe supplying the current price and key levels.
    pub primary_timeframe: Timeframe,
    pub weights: TimeframeWeights,
    pub renormalize_weights: bool,
    pub min_score_threshold: f64,
    pub cooldown_seconds: u64,
    pub risk: RiskParameters,
    pub top_reasons: usize,
    /// Attach an ATM option idea to alerts when set.
    pub options: Option<OptionsConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            symbol: "NIFTY".to_string(),
            timeframes: Timeframe::ALL.to_vec(),
            primary_timeframe: Timeframe::Short,
            weights: TimeframeWeights::default(),
            renormalize_weights: false,
            min_score_threshold: DEFAULT_MIN_SCORE_THRESHOLD,
            cooldown_seconds: DEFAULT_COOLDOWN_SECONDS as u64,
            risk: RiskParameters::default(),
            top_reasons: DEFAULT_TOP_REASONS,
            options: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let timeframes = match env::var("TIMEFRAMES") {
            Ok(raw) if !raw.trim().is_empty() => raw
                .split(',')
                .map(Timeframe::from_str)
                .collect::<Result<Vec<_>>>()?,
            _ => defaults.timeframes.clone(),
        };

        let target_anchor = match env::var("TARGET_ANCHOR").ok().as_deref().map(str::trim) {
            None | Some("") | Some("entry") => TargetAnchor::Entry,
            Some("current_price") | Some("price") => TargetAnchor::CurrentPrice,
            Some(other) => {
                return Err(EngineError::Config(format!(
                    "TARGET_ANCHOR must be 'entry' or 'current_price', got '{}'",
                    other
                )))
            }
        };

        let options = if env_or("OPTION_SUGGESTIONS", false)? {
            Some(OptionsConfig {
                strike_step: env_or("OPTION_STRIKE_STEP", DEFAULT_STRIKE_STEP)?,
                hedge_width: env_or("OPTION_HEDGE_WIDTH", DEFAULT_HEDGE_WIDTH)?,
            })
        } else {
            None
        };

        let primary_timeframe = match env::var("PRIMARY_TIMEFRAME") {
            Ok(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => defaults.primary_timeframe,
        };

        let config = Self {
            symbol: env_or("SYMBOL", defaults.symbol)?,
            timeframes,
            primary_timeframe,
            weights: TimeframeWeights::new(
                env_or("WEIGHT_SHORT", TimeframeWeights::SHORT)?,
                env_or("WEIGHT_MEDIUM", TimeframeWeights::MEDIUM)?,
                env_or("WEIGHT_LONG", TimeframeWeights::LONG)?,
            ),
            renormalize_weights: env_or("RENORMALIZE_WEIGHTS", false)?,
            min_score_threshold: env_or("MIN_SCORE_THRESHOLD", defaults.min_score_threshold)?,
            cooldown_seconds: env_or("ALERT_COOLDOWN_SECONDS", defaults.cooldown_seconds)?,
            risk: RiskParameters {
                risk_per_trade_fraction: env_or(
                    "RISK_PER_TRADE",
                    defaults.risk.risk_per_trade_fraction,
                )?,
                min_rr_ratio: env_or("MIN_RR_RATIO", defaults.risk.min_rr_ratio)?,
                account_risk_amount: env_or(
                    "ACCOUNT_RISK_AMOUNT",
                    defaults.risk.account_risk_amount,
                )?,
                target_anchor,
            },
            top_reasons: env_or("TOP_REASONS", defaults.top_reasons)?,
            options,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeframes.is_empty() {
            return Err(EngineError::Config("at least one timeframe is required".into()));
        }
        for (i, tf) in self.timeframes.iter().enumerate() {
            if self.timeframes[..i].contains(tf) {
                return Err(EngineError::Config(format!(
                    "timeframe {} is listed more than once",
                    tf
                )));
            }
        }
        for tf in &self.timeframes {
            let weight = self.weights.get(*tf);
            if !weight.is_finite() || weight < 0.0 {
                return Err(EngineError::Config(format!(
                    "weight for {} must be non-negative, got {}",
                    tf, weight
                )));
            }
        }
        if !self.weights.verify() {
            warn!(
                total = self.weights.total(),
                "timeframe weights do not sum to 1.0; aggregate scores will be scaled"
            );
        }
        if !(self.risk.min_rr_ratio > 0.0) {
            return Err(EngineError::Config("MIN_RR_RATIO must be > 0".into()));
        }
        if !(self.risk.risk_per_trade_fraction > 0.0 && self.risk.risk_per_trade_fraction <= 1.0) {
            return Err(EngineError::Config("RISK_PER_TRADE must be in (0, 1]".into()));
        }
        if !(self.risk.account_risk_amount >= 0.0) {
            return Err(EngineError::Config("ACCOUNT_RISK_AMOUNT must be >= 0".into()));
        }
        if !self.min_score_threshold.is_finite() {
            return Err(EngineError::Config("MIN_SCORE_THRESHOLD must be finite".into()));
        }
        if let Some(options) = &self.options {
            if !(options.strike_step > 0.0) {
                return Err(EngineError::Config("OPTION_STRIKE_STEP must be > 0".into()));
            }
        }
        Ok(())
    }

    pub fn cooldown(&self) -> Duration {
        Duration::seconds(self.cooldown_seconds.min(i64::MAX as u64 / 1000) as i64)
    }
}
