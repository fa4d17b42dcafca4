//! chatstack Core Library
//!
//! This library provides the chat data model, input normalization and the
//! overlay timeline simulator that turns a list of chat messages into
//! slot-stable display segments for a scrolling chat stack.

pub mod config;
pub mod ingest;
pub mod message;
pub mod simulator;
pub mod timeline;

pub use config::SimulationConfig;
pub use ingest::{normalize, RawRecord};
pub use message::ChatMessage;
pub use simulator::simulate;
pub use timeline::{MessageTrack, Segment, Timeline};

/// Result type for chatstack-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for chatstack-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
