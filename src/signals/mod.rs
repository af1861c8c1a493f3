//! Per-timeframe scoring, weighted fusion and bias classification.

pub mod aggregation;
pub mod decision;
pub mod engine;
pub mod scoring;
pub mod weights;

pub use aggregation::*;
pub use decision::*;
pub use engine::{Alert, CycleInput, CycleOutcome, CycleReport, CycleSummary, FusionEngine};
pub use scoring::*;
pub use weights::*;
