//! Philosopher - one diner and its think/eat loop.
//!
//! # Lifecycle
//!
//! ```text
//!            ┌──────────────────────────────────────────┐
//!            ▼                                          │
//!   ┌──────────────┐  both forks  ┌──────────┐  meal    │
//!   │   Thinking   │─────────────►│  Eating  │──────────┘ hunger -= 1
//!   └──────────────┘              └──────────┘
//!            │ hunger == 0
//!            ▼
//!   ┌──────────────┐
//!   │   Finished   │
//!   └──────────────┘
//! ```
//!
//! # Fork order
//!
//! Even seats take the left fork first, odd seats the right fork first.
//! Seats 1 and 2 (or 0 and 1 when N = 2) then reach for the same fork
//! first, so the N philosophers can never each hold one fork while waiting
//! for the next one around the ring.

use crate::config::DineConfig;
use crate::fork::{Fork, ForkGuard};

use dine_env::{DineContext, PhilosopherId, Status, Update, UpdateSender};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Index of the fork on the left of seat `id` at a table of `seats`.
pub fn left_fork(id: PhilosopherId, seats: usize) -> usize {
    (id.index() + seats - 1) % seats
}

/// Index of the fork on the right of seat `id`.
pub fn right_fork(id: PhilosopherId) -> usize {
    id.index()
}

/// Order in which seat `id` picks up its two forks.
pub fn acquisition_order(id: PhilosopherId, left: usize, right: usize) -> [usize; 2] {
    if id.is_even() {
        [left, right]
    } else {
        [right, left]
    }
}

/// What a philosopher reports back when its task ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhilosopherOutcome {
    /// Seat of the philosopher
    pub id: PhilosopherId,

    /// Meals eaten during the run
    pub meals: u32,

    /// Hunger left when the task ended (0 unless cancelled)
    pub remaining_hunger: u32,

    /// True if the philosopher reached `Finished`
    pub finished: bool,
}

/// A philosopher seated at the table.
///
/// Generic over the context so the same loop runs on OS entropy in
/// production or on a seeded generator in simulation.
pub struct Philosopher<Ctx: DineContext> {
    id: PhilosopherId,
    hunger: u32,
    left: usize,
    right: usize,
    forks: Arc<[Fork]>,
    context: Arc<Ctx>,
    rng: ChaCha8Rng,
    min_eat_ms: u64,
    max_eat_ms: u64,
    acquire_timeout: Option<Duration>,
    shutdown: watch::Receiver<bool>,
    reporting: bool,
}

impl<Ctx: DineContext> Philosopher<Ctx> {
    /// Seats philosopher `id` between its two forks.
    pub fn new(
        id: PhilosopherId,
        config: &DineConfig,
        forks: Arc<[Fork]>,
        context: Arc<Ctx>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let seats = forks.len();
        let rng = context.philosopher_rng(id.index() as u64);

        Self {
            id,
            hunger: config.starting_hunger,
            left: left_fork(id, seats),
            right: right_fork(id),
            forks,
            context,
            rng,
            min_eat_ms: config.min_eat.as_millis() as u64,
            max_eat_ms: config.max_eat.as_millis() as u64,
            acquire_timeout: config.acquire_timeout,
            shutdown,
            reporting: true,
        }
    }

    /// Returns the philosopher's seat.
    pub fn id(&self) -> PhilosopherId {
        self.id
    }

    /// Returns the remaining hunger.
    pub fn hunger(&self) -> u32 {
        self.hunger
    }

    /// Returns the (left, right) fork indices.
    pub fn forks(&self) -> (usize, usize) {
        (self.left, self.right)
    }

    /// Draws the next meal duration from the philosopher's generator.
    pub fn meal_duration(&mut self) -> Duration {
        Duration::from_millis(self.rng.gen_range(self.min_eat_ms..=self.max_eat_ms))
    }

    /// Runs the think/eat loop until hunger reaches zero or shutdown is requested.
    pub async fn dine(mut self, updates: UpdateSender) -> PhilosopherOutcome {
        let starting_hunger = self.hunger;
        let forks = Arc::clone(&self.forks);

        while self.hunger > 0 {
            if *self.shutdown.borrow() {
                debug!(id = %self.id, hunger = self.hunger, "leaving the table early");
                return self.outcome(starting_hunger, false);
            }

            self.report(&updates, Status::Thinking).await;
            let (_first, _second) = self.take_forks(&forks).await;

            self.report(&updates, Status::Eating).await;
            let meal = self.meal_duration();
            debug!(id = %self.id, hunger = self.hunger, meal_ms = meal.as_millis() as u64, "eating");
            self.context.sleep(meal).await;

            // Guards drop at the end of the iteration, putting both forks back.
            self.hunger -= 1;
        }

        self.report(&updates, Status::Finished).await;
        debug!(id = %self.id, "finished");
        self.outcome(starting_hunger, true)
    }

    /// Picks up both forks in seat order.
    ///
    /// With an acquisition timeout, a philosopher that cannot get its second
    /// fork in time puts the first one back, waits a random back-off and
    /// starts over.
    async fn take_forks<'a>(&mut self, forks: &'a [Fork]) -> (ForkGuard<'a>, ForkGuard<'a>) {
        let [first, second] = acquisition_order(self.id, self.left, self.right);

        loop {
            let first_guard = forks[first].acquire(self.id).await;

            let Some(timeout) = self.acquire_timeout else {
                let second_guard = forks[second].acquire(self.id).await;
                return (first_guard, second_guard);
            };

            match forks[second].acquire_within(self.id, timeout).await {
                Ok(second_guard) => return (first_guard, second_guard),
                Err(e) => {
                    drop(first_guard);
                    let backoff = Duration::from_millis(self.rng.gen_range(1..=self.max_eat_ms.max(1)));
                    warn!(id = %self.id, fork = second, error = %e, backoff_ms = backoff.as_millis() as u64, "backing off");
                    self.context.sleep(backoff).await;
                }
            }
        }
    }

    async fn report(&mut self, updates: &UpdateSender, status: Status) {
        if !self.reporting {
            return;
        }
        if let Err(e) = updates.send(Update::new(self.id, self.hunger, status)).await {
            // Nobody is watching any more; keep eating quietly.
            warn!(id = %self.id, error = %e, "observer gone, updates dropped");
            self.reporting = false;
        }
    }

    fn outcome(&self, starting_hunger: u32, finished: bool) -> PhilosopherOutcome {
        PhilosopherOutcome {
            id: self.id,
            meals: starting_hunger - self.hunger,
            remaining_hunger: self.hunger,
            finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fork::lay_forks;
    use crate::testing::SeededContext;
    use dine_env::update_channel;

    fn seat(id: usize, config: &DineConfig, seed: u64) -> Philosopher<SeededContext> {
        let (_tx, rx) = watch::channel(false);
        Philosopher::new(
            PhilosopherId(id),
            config,
            lay_forks(config.philosophers),
            Arc::new(SeededContext::new(seed)),
            rx,
        )
    }

    #[test]
    fn test_fork_topology() {
        assert_eq!(left_fork(PhilosopherId(0), 5), 4);
        assert_eq!(left_fork(PhilosopherId(3), 5), 2);
        assert_eq!(right_fork(PhilosopherId(3)), 3);

        // Each left fork is the counter-clockwise neighbour's right fork
        for n in 2..10 {
            for i in 0..n {
                let neighbour = PhilosopherId((i + n - 1) % n);
                assert_eq!(left_fork(PhilosopherId(i), n), right_fork(neighbour));
            }
        }
    }

    #[test]
    fn test_seated_between_own_forks() {
        let config = DineConfig::new(5, 3);
        for i in 0..5 {
            let philosopher = seat(i, &config, 1);
            assert_eq!(philosopher.id(), PhilosopherId(i));
            assert_eq!(philosopher.hunger(), 3);
            assert_eq!(philosopher.forks(), ((i + 4) % 5, i));
        }
    }

    #[test]
    fn test_acquisition_order_alternates() {
        assert_eq!(acquisition_order(PhilosopherId(0), 4, 0), [4, 0]);
        assert_eq!(acquisition_order(PhilosopherId(1), 0, 1), [1, 0]);
        assert_eq!(acquisition_order(PhilosopherId(2), 1, 2), [1, 2]);
    }

    /// A circular wait needs every philosopher to hold a distinct first fork.
    /// Two seats reaching for the same first fork rules that out.
    #[test]
    fn test_first_forks_collide_for_every_ring_size() {
        for n in 2..=64 {
            let mut first_forks: Vec<usize> = (0..n)
                .map(|i| {
                    let id = PhilosopherId(i);
                    acquisition_order(id, left_fork(id, n), right_fork(id))[0]
                })
                .collect();
            first_forks.sort_unstable();
            first_forks.dedup();
            assert!(first_forks.len() < n, "ring of {} could deadlock", n);
        }
    }

    #[test]
    fn test_two_seats_share_both_forks_in_same_global_order() {
        // With N = 2 both philosophers sit between forks 0 and 1.
        let p0 = PhilosopherId(0);
        let p1 = PhilosopherId(1);
        assert_eq!(acquisition_order(p0, left_fork(p0, 2), right_fork(p0)), [1, 0]);
        assert_eq!(acquisition_order(p1, left_fork(p1, 2), right_fork(p1)), [1, 0]);
    }

    #[test]
    fn test_meal_durations_are_bounded_and_seeded() {
        let config = DineConfig::new(3, 1)
            .with_eat_range(Duration::from_millis(10), Duration::from_millis(20));
        let mut a = seat(1, &config, 99);
        let mut b = seat(1, &config, 99);

        for _ in 0..100 {
            let meal = a.meal_duration();
            assert!(meal >= Duration::from_millis(10));
            assert!(meal <= Duration::from_millis(20));
            assert_eq!(meal, b.meal_duration());
        }
    }

    #[tokio::test]
    async fn test_lone_philosopher_reports_full_sequence() {
        let config = DineConfig::new(2, 3)
            .with_eat_range(Duration::ZERO, Duration::from_millis(1));
        let philosopher = seat(0, &config, 7);
        let (tx, mut rx) = update_channel(16);

        let outcome = philosopher.dine(tx).await;
        assert_eq!(
            outcome,
            PhilosopherOutcome {
                id: PhilosopherId(0),
                meals: 3,
                remaining_hunger: 0,
                finished: true,
            }
        );

        let mut seen = Vec::new();
        while let Some(update) = rx.recv().await {
            seen.push((update.hunger, update.status));
        }
        assert_eq!(
            seen,
            vec![
                (3, Status::Thinking),
                (3, Status::Eating),
                (2, Status::Thinking),
                (2, Status::Eating),
                (1, Status::Thinking),
                (1, Status::Eating),
                (0, Status::Finished),
            ]
        );
    }

    #[tokio::test]
    async fn test_keeps_dining_when_observer_is_gone() {
        let config = DineConfig::new(2, 2)
            .with_eat_range(Duration::ZERO, Duration::from_millis(1));
        let philosopher = seat(1, &config, 3);
        let (tx, rx) = update_channel(1);
        drop(rx);

        let outcome = philosopher.dine(tx).await;
        assert!(outcome.finished);
        assert_eq!(outcome.meals, 2);
    }

    #[tokio::test]
    async fn test_shutdown_stops_before_next_meal() {
        let config = DineConfig::new(2, 5);
        let (shutdown_tx, shutdown_rx) = watch::channel(true);
        let philosopher = Philosopher::new(
            PhilosopherId(0),
            &config,
            lay_forks(2),
            Arc::new(SeededContext::new(1)),
            shutdown_rx,
        );
        let (tx, mut rx) = update_channel(4);

        let outcome = philosopher.dine(tx).await;
        drop(shutdown_tx);

        assert!(!outcome.finished);
        assert_eq!(outcome.meals, 0);
        assert_eq!(outcome.remaining_hunger, 5);
        assert!(rx.recv().await.is_none());
    }
}
