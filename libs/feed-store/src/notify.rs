//! Event fan-out
//!
//! Events are emitted while the store's write lock is held, so sequence
//! numbers follow commit order.

use feed_model::{EventEnvelope, FeedEvent};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

use crate::time::TimeProvider;

/// Buffered events per subscriber before the slowest one starts lagging
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

pub struct EventNotifier {
    sender: broadcast::Sender<EventEnvelope>,
    sequence: AtomicU64,
    clock: Arc<dyn TimeProvider>,
}

impl EventNotifier {
    pub fn new(capacity: usize, clock: Arc<dyn TimeProvider>) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            sequence: AtomicU64::new(0),
            clock,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Sequence number of the most recent event, 0 if none yet
    pub fn last_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Stamp, log and broadcast one event
    pub fn emit(&self, event: FeedEvent) -> EventEnvelope {
        let envelope = EventEnvelope {
            sequence: self.sequence.fetch_add(1, Ordering::SeqCst) + 1,
            timestamp_ms: self.clock.now_millis(),
            event,
        };
        debug!(
            sequence = envelope.sequence,
            event = envelope.event.name(),
            "Event emitted"
        );
        // No subscribers is not an error
        let _ = self.sender.send(envelope.clone());
        envelope
    }
}

impl std::fmt::Debug for EventNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventNotifier")
            .field("sequence", &self.last_sequence())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
