//! Simulation context implementing DineContext for deterministic testing.

use crate::rng::DeterministicRngProvider;

use async_trait::async_trait;
use dine_env::DineContext;
use rand_chacha::ChaCha8Rng;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Simulation context backed by seeded randomness.
///
/// This implements `DineContext` using:
/// - A seeded ChaCha8 generator per philosopher, so meal durations are reproducible
/// - Real Tokio sleeps, so philosophers still run truly in parallel
/// - A running total of all time spent sleeping, for metrics
pub struct SimContext {
    /// Master seed for this simulation
    seed: u64,

    /// Per-philosopher stream derivation
    rng: DeterministicRngProvider,

    /// Total requested sleep across all tasks (nanoseconds)
    slept_ns: Arc<AtomicU64>,

    /// Creation time
    start: Instant,
}

impl SimContext {
    /// Creates a new SimContext with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: DeterministicRngProvider::new(seed),
            slept_ns: Arc::new(AtomicU64::new(0)),
            start: Instant::now(),
        }
    }

    /// Creates an Arc-wrapped context for sharing.
    pub fn shared(seed: u64) -> Arc<Self> {
        Arc::new(Self::new(seed))
    }

    /// Returns the total time all tasks asked to sleep.
    pub fn total_slept(&self) -> Duration {
        Duration::from_nanos(self.slept_ns.load(Ordering::Relaxed))
    }
}

impl Clone for SimContext {
    fn clone(&self) -> Self {
        Self {
            seed: self.seed,
            rng: self.rng,
            slept_ns: Arc::clone(&self.slept_ns),
            start: self.start,
        }
    }
}

#[async_trait]
impl DineContext for SimContext {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        self.slept_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
        tokio::time::sleep(duration).await;
    }

    fn spawn<F>(&self, name: &str, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let span = tracing::debug_span!("sim_task", name = %name, seed = self.seed);
        tokio::spawn(future.instrument(span))
    }

    fn philosopher_rng(&self, seed_extension: u64) -> ChaCha8Rng {
        self.rng.philosopher_rng(seed_extension)
    }

    fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[tokio::test]
    async fn test_sim_context_counts_sleep() {
        let ctx = SimContext::new(42);
        assert_eq!(ctx.total_slept(), Duration::ZERO);

        ctx.sleep(Duration::from_millis(3)).await;
        ctx.sleep(Duration::from_millis(2)).await;

        assert_eq!(ctx.total_slept(), Duration::from_millis(5));
        assert!(ctx.now() >= Duration::from_millis(5));
    }

    #[test]
    fn test_sim_context_deterministic_rng() {
        let ctx1 = SimContext::new(42);
        let ctx2 = SimContext::new(42);

        // Same seed + extension = same stream
        assert_eq!(
            ctx1.philosopher_rng(1).next_u64(),
            ctx2.philosopher_rng(1).next_u64()
        );

        // Different extension = different stream
        assert_ne!(
            ctx1.philosopher_rng(1).next_u64(),
            ctx1.philosopher_rng(2).next_u64()
        );
    }

    #[test]
    fn test_sim_context_seed() {
        let ctx = SimContext::new(12345);
        assert_eq!(ctx.seed(), 12345);
    }

    #[tokio::test]
    async fn test_sim_context_clone_shares_sleep_total() {
        let ctx1 = SimContext::new(42);
        let ctx2 = ctx1.clone();

        ctx1.sleep(Duration::from_millis(1)).await;

        // Both should see the same total
        assert_eq!(ctx1.total_slept(), ctx2.total_slept());
    }
}
