//! Free-text commentary attached to alerts.
//!
//! The engine never generates prose itself. A provider receives the finished
//! payload and returns text that is appended verbatim.

use async_trait::async_trait;

use crate::alerts::composer::AlertPayload;
use crate::error::Result;
use crate::models::plan::Direction;
use crate::signals::decision::TrendStrengthLabel;

#[async_trait]
pub trait CommentaryProvider: Send + Sync {
    async fn commentary(&self, payload: &AlertPayload) -> Result<String>;
}

/// Deterministic summary built from the payload's own numbers.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateCommentary;

#[async_trait]
impl CommentaryProvider for TemplateCommentary {
    async fn commentary(&self, payload: &AlertPayload) -> Result<String> {
        let side = match payload.direction {
            Direction::Long => "buyers",
            Direction::Short => "sellers",
        };
        let mut text = format!(
            "{} favours {} with {:.1}/5 confluence; risking {:.2} points for {:.2}.",
            payload.symbol,
            side,
            payload.strength,
            (payload.entry - payload.stop_loss).abs(),
            (payload.target - payload.entry).abs(),
        );
        if let Some(adx) = payload.key_indicators.and_then(|k| k.adx) {
            let label = match TrendStrengthLabel::from_adx(adx) {
                TrendStrengthLabel::Strong => "strong",
                TrendStrengthLabel::Moderate => "moderate",
                TrendStrengthLabel::Weak => "weak",
            };
            text.push_str(&format!(" Trend strength is {} (ADX {:.1}).", label, adx));
        }
        Ok(text)
    }
}
