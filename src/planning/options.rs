//! At-the-money option strike suggestion

use crate::models::plan::{OptionStrategy, OptionSuggestion, OptionType};
use crate::models::signal::Bias;

pub const DEFAULT_STRIKE_STEP: f64 = 50.0;
pub const DEFAULT_HEDGE_WIDTH: f64 = 200.0;
/// Strength at which a naked long option is preferred over a spread.
pub const SINGLE_LEG_MIN_STRENGTH: f64 = 3.0;

/// Nearest listed strike to `price`.
pub fn atm_strike(price: f64, strike_step: f64) -> f64 {
    if strike_step <= 0.0 {
        return price;
    }
    (price / strike_step).round() * strike_step
}

pub fn suggest_option_trade(
    current_price: f64,
    bias: Bias,
    strength: f64,
    strike_step: f64,
    hedge_width: f64,
) -> Option<OptionSuggestion> {
    let atm = atm_strike(current_price, strike_step);
    let (option_type, hedge_strike) = match bias {
        Bias::Bullish => (OptionType::Call, atm + hedge_width),
        Bias::Bearish => (OptionType::Put, atm - hedge_width),
        Bias::Neutral => return None,
    };

    let strategy = if strength >= SINGLE_LEG_MIN_STRENGTH {
        OptionStrategy::SingleLegBuy
    } else {
        OptionStrategy::DebitSpread
    };

    Some(OptionSuggestion {
        option_type,
        strategy,
        atm_strike: atm,
        hedge_strike,
    })
}
