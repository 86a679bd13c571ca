//! Dining Philosophers Deterministic Simulation Testing (DST) Harness
//!
//! Runs whole dinners under a seeded context so that every meal duration and
//! every back-off delay follows from a single 64-bit seed. Sleeps still run
//! on real Tokio time across worker threads, so the interleaving of
//! philosophers (and the exact order of updates) can differ between runs of
//! the same seed; the checks only rely on per-seat order.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ScenarioRunner                         │
//! │   seed ──► DeterministicRngProvider ──► table seeds         │
//! │       │                                                     │
//! │  ┌────▼─────────────────────────────────────────────┐       │
//! │  │ DineManager<SimContext>                          │       │
//! │  │   Philosopher ◄─► Fork ◄─► Philosopher  ...      │       │
//! │  └────┬─────────────────────────────────────────────┘       │
//! │       │ updates                                             │
//! │  ┌────▼──────────────┐     ┌──────────────────────┐         │
//! │  │ RecordingRenderer │ ──► │ SequenceOracle       │         │
//! │  └───────────────────┘     │ (expected sequences) │         │
//! │                            └──────────────────────┘         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use dine_sim::{ScenarioRunner, ScenarioId};
//!
//! let result = ScenarioRunner::new(42).run(ScenarioId::Classic).await;
//! assert!(result.passed);
//! ```

pub mod cli;
mod context;
mod exporter;
mod oracle;
mod rng;
mod runner;
pub mod scenarios;

pub use cli::{init_tracing, Args, CliError};
pub use context::SimContext;
pub use exporter::{SimExport, TableExport};
pub use oracle::SequenceOracle;
pub use rng::DeterministicRngProvider;
pub use runner::{RecordingRenderer, ScenarioMetrics, ScenarioResult, ScenarioRunner};
pub use scenarios::ScenarioId;
