//! Change propagation: a narrow publish/subscribe signal keyed by
//! entity id.
//!
//! Derived item display values are never cached, so the only job of a
//! signal is to tell a view *that* an entity changed; the view reads
//! fresh values on its next pass. One publish per logical change;
//! over-notification is harmless.

use crate::core::{ItemId, LocationId};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    /// A location's identity-affecting attributes (name, color,
    /// visitation order) or derived item set changed.
    LocationChanged(LocationId),
    LocationDeleted(LocationId),
    ItemChanged(ItemId),
    ItemDeleted(ItemId),
}

/// Fan-out bus for [`ChangeEvent`]s. Cloning shares the subscriber
/// list. Subscribers that dropped their receiver are pruned on the
/// next publish.
#[derive(Clone)]
pub struct ChangeBus {
    senders: Arc<Mutex<Vec<Sender<ChangeEvent>>>>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self {
            senders: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn subscribe(&self) -> Receiver<ChangeEvent> {
        let (tx, rx) = channel();
        match self.senders.lock() {
            Ok(mut senders) => senders.push(tx),
            Err(poisoned) => poisoned.into_inner().push(tx),
        }
        rx
    }

    pub fn publish(&self, event: ChangeEvent) {
        let mut senders = match self.senders.lock() {
            Ok(senders) => senders,
            Err(poisoned) => poisoned.into_inner(),
        };
        senders.retain(|tx| tx.send(event).is_ok());
    }

    /// The one operation the change-propagation contract requires: any
    /// observer reading an item that references this location sees the
    /// new values on its next read.
    pub fn location_changed(&self, id: LocationId) {
        self.publish(ChangeEvent::LocationChanged(id));
    }

    pub fn item_changed(&self, id: ItemId) {
        self.publish(ChangeEvent::ItemChanged(id));
    }

    pub fn subscriber_count(&self) -> usize {
        match self.senders.lock() {
            Ok(senders) => senders.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_receives_published_event() {
        let bus = ChangeBus::new();
        let rx = bus.subscribe();
        let id = LocationId::new();
        bus.location_changed(id);
        assert_eq!(rx.try_recv().unwrap(), ChangeEvent::LocationChanged(id));
    }

    #[test]
    fn test_all_subscribers_receive_each_event() {
        let bus = ChangeBus::new();
        let first = bus.subscribe();
        let second = bus.subscribe();
        let id = ItemId::new();
        bus.item_changed(id);
        assert_eq!(first.try_recv().unwrap(), ChangeEvent::ItemChanged(id));
        assert_eq!(second.try_recv().unwrap(), ChangeEvent::ItemChanged(id));
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let bus = ChangeBus::new();
        let rx = bus.subscribe();
        drop(rx);
        assert_eq!(bus.subscriber_count(), 1);
        bus.publish(ChangeEvent::LocationDeleted(LocationId::new()));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_publish_without_subscribers_is_harmless() {
        let bus = ChangeBus::new();
        bus.item_changed(ItemId::new());
    }
}
