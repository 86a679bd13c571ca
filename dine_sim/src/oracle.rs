//! Sequence oracle for simulation.
//!
//! The oracle knows what every philosopher *must* report, given only the
//! starting hunger:
//!
//! ```text
//! Thinking H, Eating H, Thinking H-1, Eating H-1, ..., Thinking 1, Eating 1, Finished 0
//! ```
//!
//! It is fed the observed update stream and records every deviation. Updates
//! from different philosophers may interleave freely; only each seat's own
//! order is checked.

use dine_env::{PhilosopherId, Status, Update};

/// What a seat is allowed to report next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expected {
    Thinking(u32),
    Eating(u32),
    Finished,
    Nothing,
}

impl Expected {
    fn matches(&self, update: &Update) -> bool {
        match *self {
            Expected::Thinking(h) => update.status == Status::Thinking && update.hunger == h,
            Expected::Eating(h) => update.status == Status::Eating && update.hunger == h,
            Expected::Finished => update.status == Status::Finished && update.hunger == 0,
            Expected::Nothing => false,
        }
    }

    fn next(&self) -> Expected {
        match *self {
            Expected::Thinking(h) => Expected::Eating(h),
            Expected::Eating(1) => Expected::Finished,
            Expected::Eating(h) => Expected::Thinking(h - 1),
            Expected::Finished | Expected::Nothing => Expected::Nothing,
        }
    }
}

impl std::fmt::Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Thinking(h) => write!(f, "thinking with hunger {}", h),
            Expected::Eating(h) => write!(f, "eating with hunger {}", h),
            Expected::Finished => write!(f, "finished with hunger 0"),
            Expected::Nothing => write!(f, "no further updates"),
        }
    }
}

/// Checks observed update streams against the required lifecycle.
#[derive(Debug, Clone)]
pub struct SequenceOracle {
    /// Next allowed update per seat
    expected: Vec<Expected>,

    /// Updates observed
    observed: u64,

    /// Human-readable deviations, in order of detection
    violations: Vec<String>,
}

impl SequenceOracle {
    /// Creates an oracle for `philosophers` seats starting at `starting_hunger`.
    pub fn new(philosophers: usize, starting_hunger: u32) -> Self {
        let first = if starting_hunger == 0 {
            Expected::Finished
        } else {
            Expected::Thinking(starting_hunger)
        };

        Self {
            expected: vec![first; philosophers],
            observed: 0,
            violations: Vec::new(),
        }
    }

    /// Checks one observed update.
    pub fn observe(&mut self, update: &Update) {
        self.observed += 1;

        let Some(expected) = self.expected.get_mut(update.philosopher.index()) else {
            self.violations.push(format!(
                "update from unknown philosopher {}",
                update.philosopher
            ));
            return;
        };

        if expected.matches(update) {
            *expected = expected.next();
        } else {
            self.violations.push(format!(
                "philosopher {}: expected {}, got {} with hunger {}",
                update.philosopher, expected, update.status, update.hunger
            ));
        }
    }

    /// Checks a whole update log.
    pub fn observe_all<'a>(&mut self, updates: impl IntoIterator<Item = &'a Update>) {
        for update in updates {
            self.observe(update);
        }
    }

    /// Returns the number of updates observed.
    pub fn observed(&self) -> u64 {
        self.observed
    }

    /// Returns deviations detected so far.
    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    /// Returns the seats that have not reported `Finished` yet.
    pub fn unfinished(&self) -> Vec<PhilosopherId> {
        self.expected
            .iter()
            .enumerate()
            .filter(|(_, e)| **e != Expected::Nothing)
            .map(|(i, _)| PhilosopherId(i))
            .collect()
    }

    /// Final verdict: no deviations and every seat finished.
    pub fn verdict(&self) -> Result<(), String> {
        if let Some(first) = self.violations.first() {
            return Err(format!(
                "{} sequence violation(s), first: {}",
                self.violations.len(),
                first
            ));
        }

        let unfinished = self.unfinished();
        if !unfinished.is_empty() {
            return Err(format!(
                "{} philosopher(s) never finished: {:?}",
                unfinished.len(),
                unfinished.iter().map(|p| p.index()).collect::<Vec<_>>()
            ));
        }

        Ok(())
    }
}
