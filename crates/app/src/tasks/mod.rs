//! Background tasks with explicit start/stop lifecycle.
//!
//! The application root owns these tasks: it spawns them at startup and stops
//! them at shutdown. A tick that has started runs to completion before the
//! task observes a stop request.

mod abandoned;
mod expiry;

pub use abandoned::AbandonedCartTracker;
pub use expiry::GiftExpiryMonitor;

use tokio::{sync::watch, task::JoinHandle};

/// Handle to a spawned background task.
pub struct TaskHandle {
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl TaskHandle {
    pub(crate) fn new(shutdown: watch::Sender<bool>, join: JoinHandle<()>) -> Self {
        Self { shutdown, join }
    }

    /// Signals the task to stop and waits for it to finish.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);

        if let Err(error) = self.join.await {
            tracing::warn!(%error, "background task did not shut down cleanly");
        }
    }
}
