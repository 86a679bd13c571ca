//! DineManager - seats the philosophers, runs them, and closes the channel.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        DineManager                           │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │            Context: DineContext                        │  │
//! │  │  • spawn() → one task per philosopher                  │  │
//! │  │  • sleep() → meals and back-offs                       │  │
//! │  │  • philosopher_rng() → injected randomness             │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │   forks: Arc<[Fork]>   [0] [1] [2] ... [N-1]                 │
//! │                          ▲   ▲                               │
//! │   philosopher i ── left (i-1) mod N, right i                 │
//! └──────────────────────────────────────────────────────────────┘
//!          │ UpdateSender (one clone per philosopher)
//!          ▼
//!     TableObserver
//! ```

use crate::config::DineConfig;
use crate::error::DineError;
use crate::fork::{lay_forks, Fork};
use crate::philosopher::{Philosopher, PhilosopherOutcome};
use crate::render::Renderer;
use crate::table::{TableObserver, TableState};

use dine_env::{update_channel, DineContext, PhilosopherId, UpdateSender};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct DineReport {
    /// One outcome per seat, in seat order
    pub outcomes: Vec<PhilosopherOutcome>,

    /// Total fork pick-ups
    pub fork_acquisitions: u64,

    /// Exclusivity violations observed on any fork (must be 0)
    pub fork_violations: u64,

    /// Wall time of the run
    pub elapsed: Duration,

    /// True if shutdown was requested before everyone finished
    pub cancelled: bool,
}

impl DineReport {
    /// Returns true if every philosopher reached `Finished`.
    pub fn all_finished(&self) -> bool {
        self.outcomes.iter().all(|o| o.finished && o.remaining_hunger == 0)
    }

    /// Returns the number of meals eaten across the table.
    pub fn total_meals(&self) -> u64 {
        self.outcomes.iter().map(|o| u64::from(o.meals)).sum()
    }
}

/// Asks running philosophers to leave after their current meal.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    /// Requests shutdown. Idempotent.
    pub fn shutdown(&self) {
        self.tx.send_replace(true);
    }

    /// Returns true once shutdown was requested.
    pub fn is_shutdown(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Coordinator of one dinner.
pub struct DineManager<Ctx: DineContext> {
    config: DineConfig,
    context: Arc<Ctx>,
    forks: Arc<[Fork]>,
    shutdown: Arc<watch::Sender<bool>>,
}

impl<Ctx: DineContext> DineManager<Ctx> {
    /// Validates `config` and lays the table.
    pub fn new(config: DineConfig, context: Arc<Ctx>) -> Result<Self, DineError> {
        config.validate()?;
        let forks = lay_forks(config.philosophers);
        let (shutdown, _) = watch::channel(false);

        Ok(Self {
            config,
            context,
            forks,
            shutdown: Arc::new(shutdown),
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DineConfig {
        &self.config
    }

    /// Returns the forks, for inspection.
    pub fn forks(&self) -> Arc<[Fork]> {
        Arc::clone(&self.forks)
    }

    /// Returns a handle that can stop the dinner early.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: Arc::clone(&self.shutdown),
        }
    }

    /// Creates the initial snapshot matching this table.
    pub fn initial_state(&self) -> TableState {
        TableState::new(self.config.philosophers, self.config.starting_hunger)
    }

    /// Spawns every philosopher in seat order and waits for all of them.
    ///
    /// `updates` is held until the last philosopher is done and dropped
    /// afterwards, which closes the channel for the observer.
    pub async fn run(self, updates: UpdateSender) -> Result<DineReport, DineError> {
        let start = self.context.now();
        let seats = self.config.philosophers;
        info!(
            philosophers = seats,
            hunger = self.config.starting_hunger,
            seed = self.context.seed(),
            "dinner starts"
        );

        let mut handles = Vec::with_capacity(seats);
        for i in 0..seats {
            let philosopher = Philosopher::new(
                PhilosopherId(i),
                &self.config,
                Arc::clone(&self.forks),
                Arc::clone(&self.context),
                self.shutdown.subscribe(),
            );
            let name = format!("philosopher-{}", i);
            handles.push(self.context.spawn(&name, philosopher.dine(updates.clone())));
        }

        let mut outcomes = Vec::with_capacity(seats);
        for (i, handle) in handles.into_iter().enumerate() {
            let outcome = handle.await.map_err(|e| DineError::TaskFailed {
                philosopher: PhilosopherId(i),
                reason: e.to_string(),
            })?;
            outcomes.push(outcome);
        }
        drop(updates);

        let report = DineReport {
            fork_acquisitions: self.forks.iter().map(Fork::acquisitions).sum(),
            fork_violations: self.forks.iter().map(Fork::violations).sum(),
            elapsed: self.context.now().saturating_sub(start),
            cancelled: *self.shutdown.borrow(),
            outcomes,
        };

        info!(
            meals = report.total_meals(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            cancelled = report.cancelled,
            "dinner over"
        );
        Ok(report)
    }

    /// Runs the dinner and an observer side by side.
    ///
    /// Returns the report, the final snapshot and the renderer.
    pub async fn run_observed<R: Renderer>(
        self,
        renderer: R,
    ) -> Result<(DineReport, TableState, R), DineError> {
        let (tx, rx) = update_channel(self.config.channel_capacity());
        let observer = TableObserver::new(self.initial_state(), rx, renderer);

        let (report, observed) = tokio::join!(self.run(tx), observer.run());
        let (state, renderer) = observed?;
        Ok((report?, state, renderer))
    }
}
