//! Alert payload composition. Pure: no clock reads, no I/O.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::plan::{Direction, OptionSuggestion, TradePlan};
use crate::models::signal::{Bias, FusionResult};
use crate::signals::decision::MAX_STRENGTH;

pub const DEFAULT_TOP_REASONS: usize = 3;

/// Indicator readings quoted verbatim in the alert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyIndicators {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adx: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertPayload {
    pub symbol: String,
    pub bias: Bias,
    pub strength: f64,
    pub stars: u8,
    pub direction: Direction,
    pub current_price: f64,
    pub entry: f64,
    pub stop_loss: f64,
    pub target: f64,
    pub risk_reward_ratio: f64,
    pub position_size: u64,
    pub top_reasons: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_indicators: Option<KeyIndicators>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_idea: Option<OptionSuggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
}

/// `round(strength)` clamped to 0..=5.
pub fn star_count(strength: f64) -> u8 {
    if !strength.is_finite() {
        return 0;
    }
    strength.round().clamp(0.0, MAX_STRENGTH) as u8
}

#[derive(Debug, Clone)]
pub struct MessageComposer {
    symbol: String,
    top_n_reasons: usize,
}

impl MessageComposer {
    pub fn new(symbol: impl Into<String>, top_n_reasons: usize) -> Self {
        Self {
            symbol: symbol.into(),
            top_n_reasons,
        }
    }

    pub fn compose(&self, result: &FusionResult, plan: &TradePlan) -> AlertPayload {
        self.compose_with_limit(result, plan, self.top_n_reasons)
    }

    /// Compose keeping the first `top_n_reasons` reasons in their original order.
    pub fn compose_with_limit(
        &self,
        result: &FusionResult,
        plan: &TradePlan,
        top_n_reasons: usize,
    ) -> AlertPayload {
        AlertPayload {
            symbol: self.symbol.clone(),
            bias: result.bias,
            strength: result.strength,
            stars: star_count(result.strength),
            direction: plan.direction,
            current_price: plan.current_price,
            entry: plan.entry,
            stop_loss: plan.stop_loss,
            target: plan.target,
            risk_reward_ratio: plan.risk_reward_ratio,
            position_size: plan.position_size,
            top_reasons: result
                .reasons
                .iter()
                .take(top_n_reasons)
                .cloned()
                .collect(),
            key_indicators: None,
            option_idea: None,
            commentary: None,
        }
    }
}

impl Default for MessageComposer {
    fn default() -> Self {
        Self::new("NIFTY", DEFAULT_TOP_REASONS)
    }
}

impl AlertPayload {
    pub fn with_key_indicators(mut self, indicators: KeyIndicators) -> Self {
        self.key_indicators = Some(indicators);
        self
    }

    pub fn with_option_idea(mut self, idea: OptionSuggestion) -> Self {
        self.option_idea = Some(idea);
        self
    }

    pub fn with_commentary(mut self, text: impl Into<String>) -> Self {
        self.commentary = Some(text.into());
        self
    }

    /// Plain-text rendering handed to chat/email style channels.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AlertPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (signal, entry_side, stop_side) = match self.direction {
            Direction::Long => ("BULLISH", "Above", "Below"),
            Direction::Short => ("BEARISH", "Below", "Above"),
        };

        writeln!(f, "{} TRADE ALERT", self.symbol)?;
        writeln!(f, "Signal: {} ({})", signal, self.direction)?;
        writeln!(
            f,
            "Strength: {} ({:.2}/5)",
            "★".repeat(self.stars as usize),
            self.strength
        )?;
        writeln!(f, "Current Price: {:.2}", self.current_price)?;
        writeln!(f)?;
        writeln!(f, "Setup:")?;
        writeln!(f, "Entry: {} {:.2}", entry_side, self.entry)?;
        writeln!(f, "Stop Loss: {} {:.2}", stop_side, self.stop_loss)?;
        writeln!(f, "Target: {:.2}", self.target)?;
        writeln!(f, "Risk:Reward: {:.2}", self.risk_reward_ratio)?;
        writeln!(f, "Position Size: {} units", self.position_size)?;

        if let Some(indicators) = &self.key_indicators {
            writeln!(f)?;
            writeln!(f, "Key Indicators:")?;
            if let Some(rsi) = indicators.rsi {
                writeln!(f, "RSI: {:.2}", rsi)?;
            }
            if let Some(adx) = indicators.adx {
                writeln!(f, "ADX: {:.2}", adx)?;
            }
        }

        if let Some(idea) = &self.option_idea {
            writeln!(f)?;
            writeln!(f, "Options: {}", idea.describe())?;
        }

        writeln!(f)?;
        write!(f, "Top Reasons:")?;
        for reason in &self.top_reasons {
            write!(f, "\n- {}", reason)?;
        }

        if let Some(commentary) = &self.commentary {
            write!(f, "\n\n{}", commentary)?;
        }

        Ok(())
    }
}
