//! Common types shared by the table, the observer and the simulation harness.

use crate::error::EnvError;
use serde::{Deserialize, Serialize};

/// Seat number of a philosopher at the table.
///
/// Seats are positional: philosopher `i` sits between fork `i - 1` (mod N)
/// on its left and fork `i` on its right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhilosopherId(pub usize);

impl PhilosopherId {
    /// Returns the seat index.
    pub fn index(&self) -> usize {
        self.0
    }

    /// Returns true for even seats, which reach for their left fork first.
    pub fn is_even(&self) -> bool {
        self.0 % 2 == 0
    }
}

impl std::fmt::Display for PhilosopherId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status reported by a philosopher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Waiting for forks
    Thinking,

    /// Holding both forks
    Eating,

    /// Hunger reached zero
    Finished,

    /// Not started yet (initial snapshot only)
    Unseated,
}

impl Status {
    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Thinking => "thinking",
            Status::Eating => "eating",
            Status::Finished => "finished",
            Status::Unseated => "unseated",
        }
    }

    /// Returns the glyph drawn next to the label.
    pub fn glyph(&self) -> &'static str {
        match self {
            Status::Eating => "🍴",
            Status::Thinking => "🤔",
            Status::Finished => "❤️",
            Status::Unseated => "😴",
        }
    }

    /// Returns true once no more updates will follow for this philosopher.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Finished)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Status {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "thinking" => Ok(Status::Thinking),
            "eating" => Ok(Status::Eating),
            "finished" => Ok(Status::Finished),
            "unseated" => Ok(Status::Unseated),
            _ => Err(EnvError::InvalidStatus(s.to_string())),
        }
    }
}

/// Status notification sent from a philosopher to the observer.
///
/// Updates are plain values: each one is copied into the channel and
/// consumed exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    /// Who reported
    pub philosopher: PhilosopherId,

    /// Remaining hunger at the time of the report
    pub hunger: u32,

    /// Reported status
    pub status: Status,
}

impl Update {
    /// Creates a new update.
    pub fn new(philosopher: PhilosopherId, hunger: u32, status: Status) -> Self {
        Self {
            philosopher,
            hunger,
            status,
        }
    }
}
