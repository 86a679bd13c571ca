//! Error types for the dining environment abstraction.

use thiserror::Error;

/// Errors that can occur in the environment abstraction layer.
#[derive(Debug, Error)]
pub enum EnvError {
    /// The observer side of the update channel is gone
    #[error("Update channel closed")]
    ChannelClosed,

    /// A status label that is not part of the lifecycle
    #[error("Invalid status: {0:?}")]
    InvalidStatus(String),

    /// Operation timed out
    #[error("Timeout after {0}ms")]
    Timeout(u64),
}

impl EnvError {
    /// Creates a timeout error from a duration.
    pub fn timeout(after: std::time::Duration) -> Self {
        Self::Timeout(after.as_millis() as u64)
    }
}
