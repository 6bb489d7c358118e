//! Change notifier implementations

use crate::traits::ChangeNotifier;
use crate::types::ResourceAddress;
use parking_lot::RwLock;
use std::collections::HashSet;
use tokio::sync::broadcast;
use tracing::debug;

/// Notifier that ignores every call
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl ChangeNotifier for NoopNotifier {
    fn subscribe(&self, _address: &ResourceAddress) {}

    fn notify_change(&self, _address: &ResourceAddress) {}
}

/// Notifier that fans changes out over a tokio broadcast channel
///
/// A change is delivered when some subscribed address contains it, so watching
/// a collection also reports changes to its items.
pub struct BroadcastNotifier {
    sender: broadcast::Sender<ResourceAddress>,
    watched: RwLock<HashSet<ResourceAddress>>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            watched: RwLock::new(HashSet::new()),
        }
    }

    /// Get a receiver for subsequent change announcements
    pub fn receiver(&self) -> broadcast::Receiver<ResourceAddress> {
        self.sender.subscribe()
    }

    pub fn is_watched(&self, address: &ResourceAddress) -> bool {
        self.watched.read().iter().any(|w| w.contains(address))
    }

    pub fn watched_len(&self) -> usize {
        self.watched.read().len()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(64)
    }
}

impl ChangeNotifier for BroadcastNotifier {
    fn subscribe(&self, address: &ResourceAddress) {
        if self.watched.write().insert(address.clone()) {
            debug!("Watching {} for changes", address);
        }
    }

    fn notify_change(&self, address: &ResourceAddress) {
        if !self.is_watched(address) {
            debug!("Change at {} has no watchers", address);
            return;
        }

        // Send only fails when nobody holds a receiver
        if self.sender.send(address.clone()).is_err() {
            debug!("Change at {} dropped, no receivers", address);
        }
    }
}
