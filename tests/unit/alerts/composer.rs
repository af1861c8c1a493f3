//! Unit tests for alert message composition

use confluence::alerts::composer::{star_count, KeyIndicators, MessageComposer};
use confluence::models::plan::{Direction, OptionStrategy, OptionSuggestion, OptionType, TradePlan};
use confluence::models::signal::{Bias, FusionResult};

fn result(strength: f64) -> FusionResult {
    FusionResult {
        bias: Bias::Bullish,
        strength,
        trend_strength_count: 2,
        aggregate_score: 2.4,
        reasons: vec![
            "5m Uptrend (Price > EMA20 > EMA50)".to_string(),
            "5m MACD bullish".to_string(),
            "15m MACD bullish".to_string(),
            "1h Recommendation: BUY".to_string(),
        ],
    }
}

fn plan() -> TradePlan {
    TradePlan {
        direction: Direction::Long,
        current_price: 100.0,
        entry: 102.0,
        stop_loss: 95.0,
        target: 112.5,
        risk_reward_ratio: 1.5,
        position_size: 142,
        risk_points: 7.0,
        reward_points: 10.5,
    }
}

#[test]
fn stars_round_and_clamp() {
    assert_eq!(star_count(0.0), 0);
    assert_eq!(star_count(2.4), 2);
    assert_eq!(star_count(2.5), 3);
    assert_eq!(star_count(5.0), 5);
    assert_eq!(star_count(7.0), 5);
    assert_eq!(star_count(f64::NAN), 0);
}

#[test]
fn compose_keeps_first_reasons_in_order() {
    let payload = MessageComposer::default().compose(&result(4.4), &plan());
    assert_eq!(payload.symbol, "NIFTY");
    assert_eq!(payload.stars, 4);
    assert_eq!(payload.direction, Direction::Long);
    assert_eq!(
        payload.top_reasons,
        vec![
            "5m Uptrend (Price > EMA20 > EMA50)",
            "5m MACD bullish",
            "15m MACD bullish"
        ]
    );
}

#[test]
fn compose_with_fewer_reasons_than_limit() {
    let composer = MessageComposer::new("BANKNIFTY", 10);
    let payload = composer.compose(&result(3.0), &plan());
    assert_eq!(payload.top_reasons.len(), 4);
    assert_eq!(payload.symbol, "BANKNIFTY");

    let none = composer.compose_with_limit(&result(3.0), &plan(), 0);
    assert!(none.top_reasons.is_empty());
}

#[test]
fn compose_is_idempotent() {
    let composer = MessageComposer::default();
    let first = composer.compose(&result(3.6), &plan());
    let second = composer.compose(&result(3.6), &plan());
    assert_eq!(first, second);
    assert_eq!(first.render(), second.render());
}

#[test]
fn render_includes_setup_and_reasons() {
    let payload = MessageComposer::default()
        .compose(&result(4.6), &plan())
        .with_key_indicators(KeyIndicators {
            rsi: Some(63.2),
            adx: None,
        })
        .with_option_idea(OptionSuggestion {
            option_type: OptionType::Call,
            strategy: OptionStrategy::DebitSpread,
            atm_strike: 22000.0,
            hedge_strike: 22200.0,
        })
        .with_commentary("Momentum is broad-based.");

    let text = payload.render();
    assert!(text.starts_with("NIFTY TRADE ALERT\n"));
    assert!(text.contains("Signal: BULLISH (LONG)"));
    assert!(text.contains("Strength: ★★★★★ (4.60/5)"));
    assert!(text.contains("Entry: Above 102.00"));
    assert!(text.contains("Stop Loss: Below 95.00"));
    assert!(text.contains("Target: 112.50"));
    assert!(text.contains("Risk:Reward: 1.50"));
    assert!(text.contains("Position Size: 142 units"));
    assert!(text.contains("RSI: 63.20"));
    assert!(!text.contains("ADX:"));
    assert!(text.contains("Options: Buy 22000 CALL & Sell 22200 CALL"));
    assert!(text.contains("Top Reasons:\n- 5m Uptrend (Price > EMA20 > EMA50)"));
    assert!(text.ends_with("\n\nMomentum is broad-based."));
}

#[test]
fn payload_serializes_without_empty_extras() {
    let payload = MessageComposer::default().compose(&result(3.0), &plan());
    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(json["bias"], "bullish");
    assert_eq!(json["direction"], "long");
    assert_eq!(json["position_size"], 142);
    assert!(json.get("option_idea").is_none());
    assert!(json.get("commentary").is_none());
}

#[test]
fn display_matches_render_without_extras() {
    let payload = MessageComposer::default().compose(&result(3.0), &plan());
    let text = format!("{}", payload);
    assert_eq!(text, payload.render());
    assert!(!text.contains("Key Indicators:"));
    assert!(!text.contains("Options:"));
    assert!(text.contains("Position Size: 142 units\n\nTop Reasons:\n- "));
    assert!(!text.ends_with('\n'));
}
