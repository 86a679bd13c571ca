//! Update channel between philosophers and the observer.
//!
//! ```text
//! Philosopher 0 ──┐
//! Philosopher 1 ──┼── send(update) ──> [ bounded FIFO ] ──> recv() ── Observer
//! Philosopher 2 ──┘
//! ```
//!
//! Many senders, one receiver. The channel closes once every sender has been
//! dropped; the receiver then drains what is buffered and returns `None`.

use crate::error::EnvError;
use crate::types::Update;
use tokio::sync::mpsc;

/// Creates a bounded update channel.
///
/// A full buffer makes senders wait; it never drops updates.
///
/// # Panics
/// Panics if `capacity` is zero (validated earlier by the table config).
pub fn update_channel(capacity: usize) -> (UpdateSender, UpdateReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (UpdateSender { tx }, UpdateReceiver { rx })
}

/// Sending half, cloned once per philosopher.
#[derive(Debug, Clone)]
pub struct UpdateSender {
    tx: mpsc::Sender<Update>,
}

impl UpdateSender {
    /// Queues an update, waiting for buffer space if needed.
    ///
    /// # Returns
    /// * `Ok(())` - Update queued
    /// * `Err(EnvError::ChannelClosed)` - The receiver was dropped
    pub async fn send(&self, update: Update) -> Result<(), EnvError> {
        self.tx.send(update).await.map_err(|_| EnvError::ChannelClosed)
    }

    /// Returns true if the receiver is gone.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving half, owned by the observer.
#[derive(Debug)]
pub struct UpdateReceiver {
    rx: mpsc::Receiver<Update>,
}

impl UpdateReceiver {
    /// Receives the next update.
    ///
    /// # Returns
    /// * `Some(update)` - The next update in FIFO order
    /// * `None` - Every sender is gone and the buffer is drained
    pub async fn recv(&mut self) -> Option<Update> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PhilosopherId, Status};

    #[tokio::test]
    async fn test_fifo_then_closed() {
        let (tx, mut rx) = update_channel(4);
        let first = Update::new(PhilosopherId(0), 2, Status::Thinking);
        let second = Update::new(PhilosopherId(0), 2, Status::Eating);

        tx.send(first).await.unwrap();
        tx.send(second).await.unwrap();
        drop(tx);

        assert_eq!(rx.recv().await, Some(first));
        assert_eq!(rx.recv().await, Some(second));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_send_after_receiver_dropped() {
        let (tx, rx) = update_channel(1);
        drop(rx);

        assert!(tx.is_closed());
        let err = tx
            .send(Update::new(PhilosopherId(1), 0, Status::Finished))
            .await
            .unwrap_err();
        assert!(matches!(err, EnvError::ChannelClosed));
    }

    #[tokio::test]
    async fn test_clones_keep_channel_open() {
        let (tx, mut rx) = update_channel(2);
        let tx2 = tx.clone();
        drop(tx);

        tx2.send(Update::new(PhilosopherId(2), 1, Status::Thinking))
            .await
            .unwrap();
        drop(tx2);

        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_none());
    }
}
