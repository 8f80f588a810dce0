//! In-process bus for master-data change notifications

use smartcon_domain::constants::EVENT_BUS_CAPACITY;
use smartcon_domain::MasterDataChanged;
use tokio::sync::broadcast;
use tracing::debug;

/// Fan-out of [`MasterDataChanged`] to every live subscriber.
///
/// Publishing never fails: with no subscribers the event is dropped, and a
/// subscriber that falls more than the channel capacity behind sees
/// `RecvError::Lagged` and should refetch everything.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<MasterDataChanged>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(EVENT_BUS_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Broadcast a change. Empty events are not sent.
    pub fn publish(&self, event: MasterDataChanged) {
        if event.is_empty() {
            return;
        }
        let receivers = self.sender.send(event).unwrap_or(0);
        debug!(topic = MasterDataChanged::TOPIC, ?event, receivers, "master data changed");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MasterDataChanged> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
