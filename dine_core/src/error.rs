//! Error types for the dining table.

use dine_env::{EnvError, PhilosopherId};
use thiserror::Error;

/// Rejected table configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A single philosopher would need the same fork twice
    #[error("At least 2 philosophers are required, got {0}")]
    TooFewPhilosophers(usize),

    /// More seats than tasks, forks and channel slots can be laid out for
    #[error("At most {max} philosophers are supported, got {0}", max = crate::config::MAX_PHILOSOPHERS)]
    TooManyPhilosophers(usize),

    /// Nothing to eat, nothing to render progress against
    #[error("Starting hunger must be at least 1")]
    ZeroHunger,

    /// Eating time bounds are inverted
    #[error("Invalid eating time range: {min_ms}ms..={max_ms}ms")]
    InvalidEatRange { min_ms: u64, max_ms: u64 },

    /// The update channel needs room for at least one update
    #[error("Update channel capacity must be at least 1")]
    ZeroChannelCapacity,

    /// The update channel would be larger than any supported table
    #[error("Update channel capacity must be at most {max}, got {0}", max = crate::config::MAX_PHILOSOPHERS)]
    ChannelCapacityTooLarge(usize),
}

/// Errors surfaced while running a table.
#[derive(Debug, Error)]
pub enum DineError {
    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Environment failure
    #[error("Environment error: {0}")]
    Env(#[from] EnvError),

    /// A philosopher task panicked or was aborted
    #[error("Philosopher {philosopher} task failed: {reason}")]
    TaskFailed {
        philosopher: PhilosopherId,
        reason: String,
    },

    /// An update named a seat that is not at the table
    #[error("Unknown philosopher: {0}")]
    UnknownPhilosopher(PhilosopherId),

    /// Writing a frame failed
    #[error("Render error: {0}")]
    Render(#[from] std::io::Error),
}
