// File: rusty-forms-orchestrator/src/bus.rs
// Purpose: Change notification for field validity updates

use crate::store::FormState;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Observer invoked with the form state after every validity change
pub type Observer = Arc<dyn Fn(&FormState) -> anyhow::Result<()> + Send + Sync>;

/// Ordered list of observers plus a broadcast channel for async listeners
pub struct ChangeBus {
    observers: RwLock<Vec<Observer>>,
    broadcast_tx: broadcast::Sender<FormState>,
}

impl ChangeBus {
    pub fn new(capacity: usize) -> Self {
        let (broadcast_tx, _) = broadcast::channel(capacity.max(1));

        Self {
            observers: RwLock::new(Vec::new()),
            broadcast_tx,
        }
    }

    /// Append an observer; returns the number of observers now registered
    pub async fn subscribe(&self, observer: Observer) -> usize {
        let mut observers = self.observers.write().await;
        observers.push(observer);
        observers.len()
    }

    /// Receive every future snapshot over a broadcast channel
    pub fn watch(&self) -> broadcast::Receiver<FormState> {
        self.broadcast_tx.subscribe()
    }

    /// Invoke every observer in subscription order
    ///
    /// A failing observer is logged and does not stop the ones after it.
    /// Returns the number of observers that failed.
    pub async fn notify(&self, state: &FormState) -> usize {
        // Snapshot the list so an observer may subscribe without deadlocking
        let observers: Vec<Observer> = self.observers.read().await.clone();

        let mut failures = 0;
        for (position, observer) in observers.iter().enumerate() {
            if let Err(e) = observer(state) {
                failures += 1;
                tracing::warn!(observer = position, "Form observer failed: {}", e);
            }
        }

        // No receivers is not an error
        let _ = self.broadcast_tx.send(state.clone());

        failures
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new(64)
    }
}
