//! Forks - the shared resources of the table.
//!
//! A fork is a plain async mutex with a little bookkeeping on the side:
//! who holds it right now, how often it was taken, and how often the
//! exclusivity invariant was seen broken. The last counter must stay 0.

use dine_env::{EnvError, PhilosopherId};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tracing::error;

/// Holder value of a free fork.
const FREE: usize = usize::MAX;

/// One fork, shared by the two philosophers seated next to it.
#[derive(Debug)]
pub struct Fork {
    index: usize,
    lock: Mutex<()>,
    holder: AtomicUsize,
    acquisitions: AtomicU64,
    violations: AtomicU64,
}

impl Fork {
    /// Creates a free fork at position `index`.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            lock: Mutex::new(()),
            holder: AtomicUsize::new(FREE),
            acquisitions: AtomicU64::new(0),
            violations: AtomicU64::new(0),
        }
    }

    /// Returns the fork's position at the table.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Waits until the fork is free, then takes it.
    pub async fn acquire(&self, who: PhilosopherId) -> ForkGuard<'_> {
        let lock = self.lock.lock().await;
        self.claim(who, lock)
    }

    /// Like [`Fork::acquire`], but gives up after `timeout`.
    pub async fn acquire_within(
        &self,
        who: PhilosopherId,
        timeout: Duration,
    ) -> Result<ForkGuard<'_>, EnvError> {
        match tokio::time::timeout(timeout, self.lock.lock()).await {
            Ok(lock) => Ok(self.claim(who, lock)),
            Err(_) => Err(EnvError::timeout(timeout)),
        }
    }

    fn claim<'a>(&'a self, who: PhilosopherId, lock: MutexGuard<'a, ()>) -> ForkGuard<'a> {
        if let Err(other) =
            self.holder
                .compare_exchange(FREE, who.index(), Ordering::AcqRel, Ordering::Acquire)
        {
            self.violations.fetch_add(1, Ordering::Relaxed);
            error!(fork = self.index, %who, other, "fork taken while still held");
        }
        self.acquisitions.fetch_add(1, Ordering::Relaxed);

        ForkGuard {
            fork: self,
            holder: who,
            _lock: lock,
        }
    }

    /// Returns the current holder, if any.
    pub fn holder(&self) -> Option<PhilosopherId> {
        match self.holder.load(Ordering::Acquire) {
            FREE => None,
            index => Some(PhilosopherId(index)),
        }
    }

    /// Returns how many times the fork has been taken.
    pub fn acquisitions(&self) -> u64 {
        self.acquisitions.load(Ordering::Relaxed)
    }

    /// Returns how many exclusivity violations were observed.
    pub fn violations(&self) -> u64 {
        self.violations.load(Ordering::Relaxed)
    }
}

/// Lays out `count` free forks in seat order.
pub fn lay_forks(count: usize) -> Arc<[Fork]> {
    (0..count).map(Fork::new).collect()
}

/// Proof of holding a fork. Dropping it puts the fork back.
#[derive(Debug)]
pub struct ForkGuard<'a> {
    fork: &'a Fork,
    holder: PhilosopherId,
    _lock: MutexGuard<'a, ()>,
}

impl ForkGuard<'_> {
    /// Returns the index of the held fork.
    pub fn fork_index(&self) -> usize {
        self.fork.index
    }
}

impl Drop for ForkGuard<'_> {
    fn drop(&mut self) {
        // Runs before `_lock` is dropped, so the holder is cleared while the
        // mutex is still ours.
        if let Err(other) = self.fork.holder.compare_exchange(
            self.holder.index(),
            FREE,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            self.fork.violations.fetch_add(1, Ordering::Relaxed);
            error!(fork = self.fork.index, holder = %self.holder, other, "fork released by non-holder");
        }
    }
}
