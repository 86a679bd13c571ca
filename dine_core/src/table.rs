//! Table snapshot and the observer that keeps it current.

use crate::error::DineError;
use crate::render::Renderer;

use dine_env::{PhilosopherId, Status, Update, UpdateReceiver};
use tracing::debug;

/// Latest known update per seat.
///
/// Every seat starts `Unseated` with the starting hunger; afterwards entries
/// are only overwritten, never added or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    starting_hunger: u32,
    seats: Vec<Update>,
    updates_seen: u64,
    last_update: Option<Update>,
}

impl TableState {
    /// Creates a snapshot with every seat unseated.
    pub fn new(philosophers: usize, starting_hunger: u32) -> Self {
        let seats = (0..philosophers)
            .map(|i| Update::new(PhilosopherId(i), starting_hunger, Status::Unseated))
            .collect();

        Self {
            starting_hunger,
            seats,
            updates_seen: 0,
            last_update: None,
        }
    }

    /// Overwrites the seat named by `update`.
    pub fn apply(&mut self, update: Update) -> Result<(), DineError> {
        let seat = self
            .seats
            .get_mut(update.philosopher.index())
            .ok_or(DineError::UnknownPhilosopher(update.philosopher))?;
        *seat = update;
        self.updates_seen += 1;
        self.last_update = Some(update);
        Ok(())
    }

    /// Returns every seat in order.
    pub fn seats(&self) -> &[Update] {
        &self.seats
    }

    /// Returns the latest update for one seat.
    pub fn get(&self, id: PhilosopherId) -> Option<&Update> {
        self.seats.get(id.index())
    }

    /// Returns the hunger every philosopher started with.
    pub fn starting_hunger(&self) -> u32 {
        self.starting_hunger
    }

    /// Returns the number of seats.
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    /// Returns true for a table without seats.
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Returns how many updates were applied.
    pub fn updates_seen(&self) -> u64 {
        self.updates_seen
    }

    /// Returns the update applied most recently.
    pub fn last_update(&self) -> Option<Update> {
        self.last_update
    }

    /// Returns how many seats currently show `status`.
    pub fn count(&self, status: Status) -> usize {
        self.seats.iter().filter(|s| s.status == status).count()
    }

    /// Returns true once every seat is finished with zero hunger.
    pub fn all_finished(&self) -> bool {
        self.seats
            .iter()
            .all(|s| s.status.is_terminal() && s.hunger == 0)
    }
}

/// Single consumer of the update channel.
pub struct TableObserver<R: Renderer> {
    state: TableState,
    updates: UpdateReceiver,
    renderer: R,
}

impl<R: Renderer> TableObserver<R> {
    /// Creates an observer over `state`, fed by `updates`.
    pub fn new(state: TableState, updates: UpdateReceiver, renderer: R) -> Self {
        Self {
            state,
            updates,
            renderer,
        }
    }

    /// Applies and renders updates until the channel is closed and drained.
    ///
    /// Returns the final snapshot together with the renderer.
    pub async fn run(mut self) -> Result<(TableState, R), DineError> {
        while let Some(update) = self.updates.recv().await {
            self.state.apply(update)?;
            self.renderer.render(&self.state)?;
        }

        debug!(updates = self.state.updates_seen(), "update channel closed");
        Ok((self.state, self.renderer))
    }
}
