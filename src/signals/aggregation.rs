//! Weighted cross-timeframe aggregation

use crate::models::signal::TimeframeScore;
use crate::signals::weights::TimeframeWeights;

/// Combined view of every timeframe scored this cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub score: f64,
    pub trend_strength_total: u32,
    pub reasons: Vec<String>,
}

pub struct Aggregator;

impl Aggregator {
    /// Weighted sum of the timeframe scores that are present.
    ///
    /// Weights of absent timeframes are not redistributed, so a missing
    /// timeframe shrinks the magnitude of the result.
    pub fn aggregate(scores: &[TimeframeScore], weights: &TimeframeWeights) -> Aggregate {
        let mut score = 0.0;
        let mut trend_strength_total = 0;
        let mut reasons = Vec::new();

        for tf_score in scores {
            score += tf_score.score * weights.get(tf_score.timeframe);
            trend_strength_total += tf_score.trend_strength;
            reasons.extend(tf_score.reasons.iter().cloned());
        }

        Aggregate {
            score,
            trend_strength_total,
            reasons,
        }
    }

    /// Same as [`Aggregator::aggregate`] but rescaled by the weight actually present.
    pub fn aggregate_renormalized(
        scores: &[TimeframeScore],
        weights: &TimeframeWeights,
    ) -> Aggregate {
        let mut aggregate = Self::aggregate(scores, weights);
        let present: f64 = scores.iter().map(|s| weights.get(s.timeframe)).sum();
        if present > 0.0 {
            aggregate.score /= present;
        }
        aggregate
    }
}
