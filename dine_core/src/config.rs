//! Table configuration.

use crate::error::ConfigError;
use std::time::Duration;

/// Largest table accepted. Each seat costs a task, a fork and a channel slot.
pub const MAX_PHILOSOPHERS: usize = 65_536;

/// Configuration for a dining table.
#[derive(Debug, Clone)]
pub struct DineConfig {
    /// Number of philosophers (and forks)
    pub philosophers: usize,

    /// Meals each philosopher needs before finishing
    pub starting_hunger: u32,

    /// Shortest time a meal takes
    pub min_eat: Duration,

    /// Longest time a meal takes
    pub max_eat: Duration,

    /// Give up on the second fork after this long, back off and retry.
    /// `None` waits indefinitely.
    pub acquire_timeout: Option<Duration>,

    /// Update channel capacity (`None` = one slot per philosopher)
    pub channel_capacity: Option<usize>,
}

impl Default for DineConfig {
    fn default() -> Self {
        Self {
            philosophers: 5,
            starting_hunger: 3,
            min_eat: Duration::from_millis(1),
            max_eat: Duration::from_millis(100),
            acquire_timeout: None,
            channel_capacity: None,
        }
    }
}

impl DineConfig {
    /// Creates a configuration for `philosophers` seats and `starting_hunger` meals.
    pub fn new(philosophers: usize, starting_hunger: u32) -> Self {
        Self {
            philosophers,
            starting_hunger,
            ..Self::default()
        }
    }

    /// Sets the eating time range.
    pub fn with_eat_range(mut self, min: Duration, max: Duration) -> Self {
        self.min_eat = min;
        self.max_eat = max;
        self
    }

    /// Enables timed acquisition of the second fork.
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = Some(timeout);
        self
    }

    /// Overrides the update channel capacity.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = Some(capacity);
        self
    }

    /// Returns the effective update channel capacity.
    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity.unwrap_or(self.philosophers)
    }

    /// Checks the configuration before any task is spawned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.philosophers < 2 {
            return Err(ConfigError::TooFewPhilosophers(self.philosophers));
        }
        if self.philosophers > MAX_PHILOSOPHERS {
            return Err(ConfigError::TooManyPhilosophers(self.philosophers));
        }
        if self.starting_hunger == 0 {
            return Err(ConfigError::ZeroHunger);
        }
        if self.min_eat > self.max_eat {
            return Err(ConfigError::InvalidEatRange {
                min_ms: self.min_eat.as_millis() as u64,
                max_ms: self.max_eat.as_millis() as u64,
            });
        }
        match self.channel_capacity() {
            0 => return Err(ConfigError::ZeroChannelCapacity),
            capacity if capacity > MAX_PHILOSOPHERS => {
                return Err(ConfigError::ChannelCapacityTooLarge(capacity))
            }
            _ => {}
        }
        Ok(())
    }
}
