//! Dine Core - Deadlock-Free Dining Philosophers
//!
//! N philosophers sit around a table with N forks, one between each pair of
//! neighbours. Each philosopher needs both adjacent forks to eat. This
//! library solves the two classic hazards of that setup:
//! 1. **Exclusion**: a fork is an async mutex, held by at most one philosopher
//! 2. **Deadlock**: even seats take their left fork first, odd seats their right,
//!    so the ring can never close into a circular wait
//!
//! Status updates flow from the philosophers through a bounded channel to a
//! single [`TableObserver`], which keeps a [`TableState`] snapshot and hands it
//! to a [`Renderer`] after every update.

pub mod config;
pub mod error;
pub mod fork;
pub mod manager;
pub mod philosopher;
pub mod render;
pub mod table;

#[cfg(test)]
mod testing;

// Re-export key types for convenience
pub use config::{DineConfig, MAX_PHILOSOPHERS};
pub use error::{ConfigError, DineError};
pub use fork::{Fork, ForkGuard};
pub use manager::{DineManager, DineReport, ShutdownHandle};
pub use philosopher::{Philosopher, PhilosopherOutcome};
pub use render::{NullRenderer, Renderer};
#[cfg(feature = "console")]
pub use render::ConsoleRenderer;
pub use table::{TableObserver, TableState};
