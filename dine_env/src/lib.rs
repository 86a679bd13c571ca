//! Dining Table Environment Abstraction Layer
//!
//! This crate provides the "Sans-IO" abstraction allowing the table to run
//! in both **Production** (OS entropy) and **Simulation** (seeded) environments.
//!
//! # Core Concept: The Reactor Pattern
//!
//! For Deterministic Simulation Testing (DST), we intercept:
//! - Time (`now()`, `sleep()`)
//! - Task spawning (`spawn()`)
//! - Randomness (`philosopher_rng()`)
//!
//! By deriving all entropy from a single 64-bit seed, every eating duration
//! of a run becomes reproducible via its seed number.
//!
//! # Example
//!
//! ```ignore
//! use dine_env::{DineContext, update_channel};
//!
//! async fn think_then_eat<Ctx: DineContext>(ctx: &Ctx) {
//!     let mut rng = ctx.philosopher_rng(0);
//!     let meal = Duration::from_millis(rng.gen_range(1..=100));
//!     ctx.sleep(meal).await;
//! }
//! ```

mod channel;
mod context;
mod types;
mod error;
mod tokio_impl;

pub use channel::{update_channel, UpdateReceiver, UpdateSender};
pub use context::DineContext;
pub use types::{PhilosopherId, Status, Update};
pub use error::EnvError;
pub use tokio_impl::TokioContext;
