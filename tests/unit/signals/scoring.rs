//! Unit tests for per-timeframe scoring

use confluence::models::indicators::{ProviderRecommendation, Timeframe};
use confluence::signals::scoring::{bollinger_position, Scorer};

use crate::fixtures::{approx, bare, bearish, bullish};

#[test]
fn bare_snapshot_scores_zero_with_recommendation_reason_only() {
    let score = Scorer::score(&bare(Timeframe::Short, 100.0));
    assert_eq!(score.score, 0.0);
    assert_eq!(score.trend_strength, 0);
    assert_eq!(score.reasons, vec!["5m Recommendation: NEUTRAL".to_string()]);
}

#[test]
fn fully_bullish_snapshot() {
    let score = Scorer::score(&bullish(Timeframe::Short));
    assert!(approx(score.score, 5.5));
    assert_eq!(score.trend_strength, 1);
    assert_eq!(
        score.reasons,
        vec![
            "5m Uptrend (Price > EMA20 > EMA50)",
            "5m Strong RSI with momentum (65.00)",
            "5m MACD bullish",
            "5m Strong uptrend (ADX: 30.00)",
            "5m Stochastic bullish crossover",
            "5m Recommendation: BUY",
        ]
    );
}

#[test]
fn fully_bearish_snapshot() {
    let score = Scorer::score(&bearish(Timeframe::Long));
    assert!(approx(score.score, -5.5));
    assert_eq!(score.trend_strength, 1);
    assert_eq!(score.reasons[0], "1h Downtrend (Price < EMA20 < EMA50)");
    assert_eq!(score.reasons[1], "1h Weak RSI with momentum (35.00)");
    assert!(score.reasons.contains(&"1h Strong downtrend (ADX: 30.00)".to_string()));
}

#[test]
fn rsi_needs_momentum_in_the_same_direction() {
    let fading = bare(Timeframe::Short, 100.0).with_rsi(65.0, 70.0);
    assert_eq!(Scorer::score(&fading).score, 0.0);

    let recovering = bare(Timeframe::Short, 100.0).with_rsi(35.0, 30.0);
    assert_eq!(Scorer::score(&recovering).score, 0.0);
}

#[test]
fn macd_equal_lines_count_as_bearish() {
    let snapshot = bare(Timeframe::Medium, 100.0).with_macd(0.5, 0.5);
    let score = Scorer::score(&snapshot);
    assert_eq!(score.score, -1.0);
    assert_eq!(score.reasons[0], "15m MACD bearish");
}

#[test]
fn bollinger_extremes_score_against_the_move() {
    let overbought = bare(Timeframe::Short, 103.5).with_bollinger(104.0, 100.0, 96.0);
    let score = Scorer::score(&overbought);
    assert_eq!(score.score, -0.5);
    assert_eq!(score.reasons[0], "5m Overbought (BB)");

    let oversold = bare(Timeframe::Short, 96.5).with_bollinger(104.0, 100.0, 96.0);
    assert_eq!(Scorer::score(&oversold).score, 0.5);
}

#[test]
fn zero_width_bands_contribute_nothing() {
    let snapshot = bare(Timeframe::Short, 100.0).with_bollinger(100.0, 100.0, 100.0);
    assert_eq!(Scorer::score(&snapshot).score, 0.0);
    assert_eq!(bollinger_position(100.0, 100.0, 100.0), None);
    assert_eq!(bollinger_position(98.0, 96.0, 104.0), Some(0.25));
}

#[test]
fn weak_adx_sets_no_trend_strength() {
    let snapshot = bare(Timeframe::Short, 100.0).with_adx(25.0, 30.0, 10.0);
    let score = Scorer::score(&snapshot);
    assert_eq!(score.trend_strength, 0);
    assert_eq!(score.score, 0.0);
}

#[test]
fn adx_without_directional_lines_reads_as_downtrend() {
    let mut snapshot = bare(Timeframe::Short, 100.0);
    snapshot.adx = Some(40.0);
    let score = Scorer::score(&snapshot);
    assert_eq!(score.trend_strength, 1);
    assert_eq!(score.score, -1.0);
}

#[test]
fn stochastic_crossovers_ignore_extreme_zones() {
    let overbought_cross = bare(Timeframe::Short, 100.0).with_stochastic(85.0, 80.0);
    assert_eq!(Scorer::score(&overbought_cross).score, 0.0);

    let oversold_cross = bare(Timeframe::Short, 100.0).with_stochastic(15.0, 20.0);
    assert_eq!(Scorer::score(&oversold_cross).score, 0.0);
}

#[test]
fn strong_recommendation_counts_double() {
    let snapshot =
        bare(Timeframe::Long, 100.0).with_recommendation(ProviderRecommendation::StrongSell);
    let score = Scorer::score(&snapshot);
    assert_eq!(score.score, -2.0);
    assert_eq!(score.reasons, vec!["1h Recommendation: STRONG_SELL".to_string()]);
}
