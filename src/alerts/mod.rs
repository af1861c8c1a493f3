//! Alert gating and message composition.

pub mod composer;
pub mod gate;

pub use composer::{star_count, AlertPayload, KeyIndicators, MessageComposer};
pub use gate::{AlertGate, AlertGateState, GateDecision};
