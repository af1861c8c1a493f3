//! Error taxonomy for the fusion engine.
//!
//! Every variant except [`EngineError::GateStateCorrupted`] is local to a single
//! cycle: the runtime logs it and moves on to the next poll.

use crate::models::indicators::Timeframe;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("timeframe {0} has no snapshot this cycle")]
    MissingTimeframe(Timeframe),

    #[error("degenerate price levels: {0}")]
    DegenerateLevels(String),

    #[error("risk/reward undefined: entry equals stop loss at {0}")]
    DivisionUndefined(f64),

    #[error("{timeframe} {indicator} outside its nominal range: {value}")]
    OutOfRangeIndicator {
        timeframe: Timeframe,
        indicator: &'static str,
        value: f64,
    },

    #[error("invalid {timeframe} snapshot: {reason}")]
    InvalidSnapshot { timeframe: Timeframe, reason: String },

    #[error("no directional bias to plan a trade from")]
    NeutralBias,

    #[error("market data unavailable: {0}")]
    DataUnavailable(String),

    #[error("snapshot fetch timed out after {0}s")]
    FetchTimeout(u64),

    #[error("alert delivery failed on {channel}: {reason}")]
    Delivery { channel: String, reason: String },

    #[error("commentary unavailable: {0}")]
    Commentary(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("alert gate state corrupted: {0}")]
    GateStateCorrupted(String),
}

impl EngineError {
    /// Errors that mean "no valid setup this cycle" rather than a failure.
    pub fn is_no_setup(&self) -> bool {
        matches!(
            self,
            EngineError::DegenerateLevels(_)
                | EngineError::DivisionUndefined(_)
                | EngineError::NeutralBias
        )
    }

    /// Only a broken alert gate invariant may stop the hosting process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::GateStateCorrupted(_))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
