//! Seeded context for unit tests.

use async_trait::async_trait;
use dine_env::DineContext;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Real clock, seeded randomness.
pub struct SeededContext {
    seed: u64,
    start: Instant,
}

impl SeededContext {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            start: Instant::now(),
        }
    }
}

#[async_trait]
impl DineContext for SeededContext {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn spawn<F>(&self, _name: &str, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        tokio::spawn(future)
    }

    fn philosopher_rng(&self, seed_extension: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed ^ seed_extension.wrapping_mul(0x9e3779b97f4a7c15))
    }

    fn seed(&self) -> u64 {
        self.seed
    }
}
