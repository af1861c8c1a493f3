//! Timeframe importance weights

use serde::{Deserialize, Serialize};

use crate::models::indicators::Timeframe;

/// Weight applied to each timeframe's score during aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeframeWeights {
    pub short: f64,
    pub medium: f64,
    pub long: f64,
}

impl TimeframeWeights {
    pub const SHORT: f64 = 0.5;
    pub const MEDIUM: f64 = 0.3;
    pub const LONG: f64 = 0.2;

    pub fn new(short: f64, medium: f64, long: f64) -> Self {
        Self { short, medium, long }
    }

    pub fn get(&self, timeframe: Timeframe) -> f64 {
        match timeframe {
            Timeframe::Short => self.short,
            Timeframe::Medium => self.medium,
            Timeframe::Long => self.long,
        }
    }

    pub fn total(&self) -> f64 {
        self.short + self.medium + self.long
    }

    /// Verify weights sum to 1.0
    pub fn verify(&self) -> bool {
        (self.total() - 1.0).abs() < 0.001
    }
}

impl Default for TimeframeWeights {
    fn default() -> Self {
        Self::new(Self::SHORT, Self::MEDIUM, Self::LONG)
    }
}
