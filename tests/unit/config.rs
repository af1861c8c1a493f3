//! Unit tests for environment configuration

use confluence::config::{env_or, EngineConfig, OptionsConfig};
use confluence::error::EngineError;
use confluence::models::indicators::Timeframe;
use confluence::planning::trade_plan::TargetAnchor;
use confluence::signals::weights::TimeframeWeights;
use std::env;

const KEYS: &[&str] = &[
    "SYMBOL",
    "TIMEFRAMES",
    "PRIMARY_TIMEFRAME",
    "WEIGHT_SHORT",
    "RENORMALIZE_WEIGHTS",
    "ALERT_COOLDOWN_SECONDS",
    "TARGET_ANCHOR",
    "OPTION_SUGGESTIONS",
    "OPTION_STRIKE_STEP",
    "MIN_RR_RATIO",
];

#[test]
fn defaults_are_valid() {
    let config = EngineConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.symbol, "NIFTY");
    assert_eq!(config.timeframes, Timeframe::ALL.to_vec());
    assert_eq!(config.min_score_threshold, 3.0);
    assert_eq!(config.cooldown_seconds, 300);
    assert_eq!(config.cooldown().num_seconds(), 300);
    assert_eq!(config.risk.min_rr_ratio, 1.5);
    assert_eq!(config.risk.risk_per_trade_fraction, 0.01);
    assert_eq!(config.top_reasons, 3);
}

#[test]
fn validation_rejects_bad_values() {
    let empty = EngineConfig {
        timeframes: Vec::new(),
        ..EngineConfig::default()
    };
    assert!(empty.validate().is_err());

    let negative = EngineConfig {
        weights: TimeframeWeights::new(-0.1, 0.6, 0.5),
        ..EngineConfig::default()
    };
    assert!(negative.validate().is_err());

    let mut bad_rr = EngineConfig::default();
    bad_rr.risk.min_rr_ratio = 0.0;
    assert!(bad_rr.validate().is_err());

    let mut bad_fraction = EngineConfig::default();
    bad_fraction.risk.risk_per_trade_fraction = 1.5;
    assert!(bad_fraction.validate().is_err());

    let bad_step = EngineConfig {
        options: Some(OptionsConfig {
            strike_step: 0.0,
            hedge_width: 200.0,
        }),
        ..EngineConfig::default()
    };
    assert!(bad_step.validate().is_err());
}

#[test]
fn repeated_timeframes_are_rejected() {
    let config = EngineConfig {
        timeframes: vec![Timeframe::Short, Timeframe::Short],
        ..EngineConfig::default()
    };
    match config.validate() {
        Err(EngineError::Config(msg)) => assert!(msg.contains("5m"), "{}", msg),
        other => panic!("expected config error, got {:?}", other),
    }

    let reordered = EngineConfig {
        timeframes: vec![Timeframe::Long, Timeframe::Short, Timeframe::Long],
        ..EngineConfig::default()
    };
    assert!(reordered.validate().is_err());
}

#[test]
fn unbalanced_weights_are_allowed() {
    let config = EngineConfig {
        weights: TimeframeWeights::new(1.0, 1.0, 1.0),
        ..EngineConfig::default()
    };
    assert!(config.validate().is_ok());
}

// Single test owns every environment mutation so parallel tests never race.
#[test]
fn from_env_reads_overrides() {
    for key in KEYS {
        env::remove_var(key);
    }
    assert_eq!(EngineConfig::from_env().unwrap(), EngineConfig::default());

    env::set_var("SYMBOL", "BANKNIFTY");
    env::set_var("TIMEFRAMES", "5m,1h");
    env::set_var("PRIMARY_TIMEFRAME", "long");
    env::set_var("WEIGHT_SHORT", "0.8");
    env::set_var("RENORMALIZE_WEIGHTS", "true");
    env::set_var("ALERT_COOLDOWN_SECONDS", "60");
    env::set_var("TARGET_ANCHOR", "current_price");
    env::set_var("OPTION_SUGGESTIONS", "true");
    env::set_var("OPTION_STRIKE_STEP", "100");

    let config = EngineConfig::from_env().unwrap();
    assert_eq!(config.symbol, "BANKNIFTY");
    assert_eq!(config.timeframes, vec![Timeframe::Short, Timeframe::Long]);
    assert_eq!(config.primary_timeframe, Timeframe::Long);
    assert_eq!(config.weights.short, 0.8);
    assert!(config.renormalize_weights);
    assert_eq!(config.cooldown_seconds, 60);
    assert_eq!(config.risk.target_anchor, TargetAnchor::CurrentPrice);
    assert_eq!(
        config.options,
        Some(OptionsConfig {
            strike_step: 100.0,
            hedge_width: 200.0
        })
    );

    env::set_var("TARGET_ANCHOR", "midpoint");
    assert!(matches!(EngineConfig::from_env(), Err(EngineError::Config(_))));
    env::remove_var("TARGET_ANCHOR");

    env::set_var("MIN_RR_RATIO", "abc");
    assert!(matches!(EngineConfig::from_env(), Err(EngineError::Config(_))));
    env::remove_var("MIN_RR_RATIO");

    env::set_var("TIMEFRAMES", "short,short");
    assert!(matches!(EngineConfig::from_env(), Err(EngineError::Config(_))));

    for key in KEYS {
        env::remove_var(key);
    }
}

#[test]
fn env_or_falls_back_when_unset() {
    assert_eq!(env_or("CONFLUENCE_TEST_UNSET_KEY", 42u64).unwrap(), 42);
}
