//! Core environment context trait for the dining table.

use async_trait::async_trait;
use rand_chacha::ChaCha8Rng;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// The central interface for Environment Interaction.
///
/// This trait abstracts the "real world" so that philosophers and their
/// coordinator can run both in production (OS entropy) and in deterministic
/// simulation (seeded entropy).
///
/// # Implementations
///
/// - **Production**: `TokioContext` - wraps `tokio::time`, `ChaCha8Rng::from_entropy`
/// - **Simulation**: `SimContext` - wraps `tokio::time`, `ChaCha8Rng(seed)`
///
/// # Determinism
///
/// All randomness a philosopher consumes comes from the generator returned by
/// [`DineContext::philosopher_rng`], so a seeded context reproduces every
/// eating duration and back-off delay.
#[async_trait]
pub trait DineContext: Send + Sync + 'static {
    /// Returns the monotonic time since context creation.
    fn now(&self) -> Duration;

    /// Suspends the calling task for the given duration.
    ///
    /// Never a busy-wait: the task yields to the scheduler.
    async fn sleep(&self, duration: Duration);

    /// Spawns a named task and returns its handle.
    ///
    /// The handle is the completion signal: awaiting it tells the caller
    /// the task has run to its end.
    fn spawn<F>(&self, name: &str, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static;

    /// Creates the random generator owned by one philosopher.
    ///
    /// # Arguments
    /// * `seed_extension` - Combined with the context seed so each
    ///   philosopher gets its own, reproducible stream
    fn philosopher_rng(&self, seed_extension: u64) -> ChaCha8Rng;

    /// Returns the context's seed (for logging/debugging).
    ///
    /// In production, returns 0 (not seeded).
    /// In simulation, returns the master seed.
    fn seed(&self) -> u64;
}
