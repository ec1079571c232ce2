//! Delayed event delivery
//!
//! Components never mutate themselves from a timer. Instead they hand an
//! event to the [`Scheduler`], which sleeps on a tokio task and then sends the
//! event into a channel drained by the owner's event loop. State therefore only
//! changes on the loop that owns it, one event at a time.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Sends events into an unbounded channel after a delay.
pub struct Scheduler<E> {
    tx: mpsc::UnboundedSender<E>,
}

impl<E> Clone for Scheduler<E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<E: Send + 'static> Scheduler<E> {
    pub fn new(tx: mpsc::UnboundedSender<E>) -> Self {
        Self { tx }
    }

    /// Create a scheduler together with the receiver its events arrive on.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<E>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Deliver `event` once `delay` has elapsed.
    ///
    /// Must be called from within a tokio runtime. The returned handle can be
    /// used to cancel delivery; dropping it does not.
    pub fn schedule(&self, delay: Duration, event: E) -> TaskHandle {
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the app is shutting down
            let _ = tx.send(event);
        });
        TaskHandle { handle }
    }
}

/// Reference to a scheduled delivery.
#[derive(Debug)]
pub struct TaskHandle {
    handle: JoinHandle<()>,
}

impl TaskHandle {
    /// Stop the delivery if it has not happened yet.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
