//! Trade plan derivation.

pub mod options;
pub mod trade_plan;

pub use options::{atm_strike, suggest_option_trade};
pub use trade_plan::{position_size, risk_reward_ratio, RiskParameters, TargetAnchor, TradePlanner};
