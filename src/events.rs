//! Map event bus
//!
//! Replaces ambient global callbacks with explicit subscriptions. A map view
//! subscribes on mount and keeps the returned [`Subscription`]; dropping it on
//! unmount unregisters the receiver so nothing leaks across navigations.

use crate::selection::ZoomTarget;
use crossbeam_channel::{unbounded, Receiver, Sender};
use seabed_types::{ContractorId, CruiseId, StationId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Show the cruise tracks of a contractor
    ShowCruises(ContractorId),
    FocusCruise(CruiseId),
    FocusStation(StationId),
    ZoomTo(ZoomTarget),
    /// Return to the default extent
    ResetView,
}

type Registry = HashMap<u64, Sender<MapEvent>>;

#[derive(Debug, Default)]
struct BusInner {
    subscribers: Mutex<Registry>,
    next_id: Mutex<u64>,
}

/// Cloneable handle; all clones share one subscriber registry
#[derive(Debug, Clone, Default)]
pub struct MapEventBus {
    inner: Arc<BusInner>,
}

impl MapEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn subscribe(&self) -> Subscription {
        let id = {
            let mut next = self
                .inner
                .next_id
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *next += 1;
            *next
        };
        let (tx, rx) = unbounded();
        self.registry().insert(id, tx);
        debug!(subscriber = id, "map subscriber registered");
        Subscription {
            id,
            receiver: rx,
            bus: Arc::clone(&self.inner),
        }
    }

    /// Deliver to every live subscriber; returns how many received it
    pub fn publish(&self, event: MapEvent) -> usize {
        let mut registry = self.registry();
        registry.retain(|_, tx| tx.send(event.clone()).is_ok());
        registry.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry().len()
    }
}

/// Live registration; unregisters on drop
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    receiver: Receiver<MapEvent>,
    bus: Arc<BusInner>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Next queued event without blocking
    pub fn try_next(&self) -> Option<MapEvent> {
        self.receiver.try_recv().ok()
    }

    /// Drain everything queued so far
    pub fn drain(&self) -> Vec<MapEvent> {
        self.receiver.try_iter().collect()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut registry = self
            .bus
            .subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        registry.remove(&self.id);
        debug!(subscriber = self.id, "map subscriber unregistered");
    }
}
