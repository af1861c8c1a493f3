//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod plan;
pub mod signal;

pub use indicators::{IndicatorSnapshot, ProviderRecommendation, SnapshotSet, Timeframe};
pub use plan::{Direction, KeyLevels, OptionStrategy, OptionSuggestion, OptionType, TradePlan};
pub use signal::{Bias, FusionResult, TimeframeScore, VolumePressure};
