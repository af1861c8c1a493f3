//! Multi-timeframe signal fusion and trade-plan engine.
//!
//! Indicator snapshots for several timeframes are scored, fused into one
//! directional bias, gated by score and cooldown, and turned into a concrete
//! trade plan and alert payload.

pub mod alerts;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod planning;
pub mod services;
pub mod signals;

pub use error::{EngineError, Result};
