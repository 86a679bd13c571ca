//! Liveness and safety scenarios for DST.

use dine_core::DineConfig;
use std::time::Duration;

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// DST-001: the textbook table of five
    Classic,

    /// DST-002: two philosophers sharing both forks
    Pair,

    /// DST-003: odd ring, two even seats meet at the wraparound
    OddRing,

    /// DST-004: every ring size from 2 to 20
    Sweep,

    /// DST-005: 64 philosophers, heavy contention on the channel
    Crowd,

    /// DST-006: timed second-fork acquisition with back-off and retry
    TimeoutRetry,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::Classic,
            ScenarioId::Pair,
            ScenarioId::OddRing,
            ScenarioId::Sweep,
            ScenarioId::Crowd,
            ScenarioId::TimeoutRetry,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Classic => "classic",
            ScenarioId::Pair => "pair",
            ScenarioId::OddRing => "odd_ring",
            ScenarioId::Sweep => "sweep",
            ScenarioId::Crowd => "crowd",
            ScenarioId::TimeoutRetry => "timeout_retry",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Classic => "5 philosophers, hunger 3",
            ScenarioId::Pair => "2 philosophers, hunger 10, both forks shared",
            ScenarioId::OddRing => "7 philosophers, hunger 5, wraparound between two even seats",
            ScenarioId::Sweep => "ring sizes 2..=20, hunger 3 each",
            ScenarioId::Crowd => "64 philosophers, hunger 2",
            ScenarioId::TimeoutRetry => "6 philosophers, hunger 4, 1ms second-fork timeout",
        }
    }

    /// Returns the tables the scenario runs, in order.
    ///
    /// # Arguments
    /// * `max_eat` - Upper bound on a single meal
    pub fn tables(&self, max_eat: Duration) -> Vec<DineConfig> {
        let table = |n: usize, hunger: u32| {
            DineConfig::new(n, hunger).with_eat_range(Duration::ZERO, max_eat)
        };

        match self {
            ScenarioId::Classic => vec![table(5, 3)],
            ScenarioId::Pair => vec![table(2, 10)],
            ScenarioId::OddRing => vec![table(7, 5)],
            ScenarioId::Sweep => (2..=20).map(|n| table(n, 3)).collect(),
            ScenarioId::Crowd => vec![table(64, 2)],
            ScenarioId::TimeoutRetry => {
                vec![table(6, 4).with_acquire_timeout(Duration::from_millis(1))]
            }
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classic" | "dst-001" => Ok(ScenarioId::Classic),
            "pair" | "dst-002" => Ok(ScenarioId::Pair),
            "odd_ring" | "oddring" | "dst-003" => Ok(ScenarioId::OddRing),
            "sweep" | "dst-004" => Ok(ScenarioId::Sweep),
            "crowd" | "dst-005" => Ok(ScenarioId::Crowd),
            "timeout_retry" | "timeoutretry" | "dst-006" => Ok(ScenarioId::TimeoutRetry),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
