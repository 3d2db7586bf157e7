mod types;

pub use types::MetricsSnapshot;

use std::sync::Arc;
use tokio::sync::watch;

/// Holds the single current `MetricsSnapshot`.
///
/// Single writer (the sampling loop), many readers: every update is a whole
/// value replacement through a watch channel, so readers never observe a
/// snapshot mid-write. No history is retained here; freezing snapshots into
/// session history is the orchestrator's job.
#[derive(Clone)]
pub struct MetricsStore {
    tx: Arc<watch::Sender<MetricsSnapshot>>,
}

impl MetricsStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(MetricsSnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    /// Replace the current snapshot. Called only by the sampling loop.
    pub fn publish(&self, snapshot: MetricsSnapshot) {
        self.tx.send_replace(snapshot);
    }

    /// Latest snapshot, cloned out of the channel.
    pub fn latest(&self) -> MetricsSnapshot {
        self.tx.borrow().clone()
    }

    /// Receiver for consumers that want to observe every update.
    pub fn watch(&self) -> watch::Receiver<MetricsSnapshot> {
        self.tx.subscribe()
    }

    /// Reset to defaults so a new session starts from a clean slate.
    pub fn reset(&self) {
        self.publish(MetricsSnapshot::default());
    }
}

impl Default for MetricsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_reflects_last_publish() {
        let store = MetricsStore::new();
        assert_eq!(store.latest(), MetricsSnapshot::default());

        let snapshot = MetricsSnapshot {
            confidence: 72.0,
            ..Default::default()
        };
        store.publish(snapshot.clone());
        assert_eq!(store.latest(), snapshot);
    }

    #[test]
    fn reset_restores_defaults() {
        let store = MetricsStore::new();
        store.publish(MetricsSnapshot {
            eye_contact: 90.0,
            ..Default::default()
        });
        store.reset();
        assert_eq!(store.latest(), MetricsSnapshot::default());
    }

    #[tokio::test]
    async fn watch_receiver_observes_updates() {
        let store = MetricsStore::new();
        let mut rx = store.watch();

        store.publish(MetricsSnapshot {
            confidence: 55.0,
            ..Default::default()
        });
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().confidence, 55.0);
    }

    #[test]
    fn clones_share_the_same_value() {
        let store = MetricsStore::new();
        let reader = store.clone();
        store.publish(MetricsSnapshot {
            pause_ratio: 40.0,
            ..Default::default()
        });
        assert_eq!(reader.latest().pause_ratio, 40.0);
    }
}
