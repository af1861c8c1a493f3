//! Collaborators at the engine's edges: data in, alerts and commentary out.

pub mod commentary;
pub mod delivery;
pub mod market_data;

pub use commentary::{CommentaryProvider, TemplateCommentary};
pub use delivery::{AlertSink, ChannelSink, LogSink};
pub use market_data::{
    JsonFileSnapshotProvider, MarketDataProvider, MarketSnapshot, StaticSnapshotProvider,
};
