//! Global listener registry
//!
//! Widgets that need document or window level events (outside-click
//! dismissal, scroll and resize reflow) register interest here instead of
//! holding callbacks. The host routes an event to every owner returned by
//! [`ListenerRegistry::owners_for`], and each widget double-checks that it is
//! still listening before reacting.
//!
//! Registration is scoped: [`Subscription`] removes its entry when dropped,
//! so releasing a widget's listeners is a matter of dropping the guards.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::dom::ElementId;
use crate::events::EventType;

new_key_type! {
    /// Unique identifier for a registered listener
    pub struct ListenerId;
}

/// Where a global listener is attached
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    Document,
    Window,
}

#[derive(Clone, Copy, Debug)]
struct ListenerEntry {
    target: ListenerTarget,
    event_type: EventType,
    owner: ElementId,
}

/// Registry of document/window listeners keyed by owning element
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    entries: SlotMap<ListenerId, ListenerEntry>,
}

/// Registry shared between a document and the widgets living in it
pub type SharedListenerRegistry = Arc<Mutex<ListenerRegistry>>;

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry ready to be shared
    pub fn shared() -> SharedListenerRegistry {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Register `owner` for `event_type` on `target`
    pub fn on(
        &mut self,
        target: ListenerTarget,
        event_type: EventType,
        owner: ElementId,
    ) -> ListenerId {
        self.entries.insert(ListenerEntry {
            target,
            event_type,
            owner,
        })
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn off(&mut self, id: ListenerId) -> bool {
        self.entries.remove(id).is_some()
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of listeners registered by `owner`
    pub fn count_for_owner(&self, owner: ElementId) -> usize {
        self.entries.values().filter(|e| e.owner == owner).count()
    }

    /// Whether `owner` listens for `event_type` on `target`
    pub fn is_listening(
        &self,
        owner: ElementId,
        target: ListenerTarget,
        event_type: EventType,
    ) -> bool {
        self.entries
            .values()
            .any(|e| e.owner == owner && e.target == target && e.event_type == event_type)
    }

    /// Owners listening for `event_type` on `target`, each listed once
    pub fn owners_for(
        &self,
        target: ListenerTarget,
        event_type: EventType,
    ) -> SmallVec<[ElementId; 4]> {
        let mut owners: SmallVec<[ElementId; 4]> = SmallVec::new();
        for entry in self.entries.values() {
            if entry.target == target
                && entry.event_type == event_type
                && !owners.contains(&entry.owner)
            {
                owners.push(entry.owner);
            }
        }
        owners
    }
}

/// A registered listener that is removed from its registry on drop
#[derive(Debug)]
pub struct Subscription {
    registry: Weak<Mutex<ListenerRegistry>>,
    id: ListenerId,
    target: ListenerTarget,
    event_type: EventType,
}

impl Subscription {
    /// Register `owner` for `event_type` on `target`
    pub fn subscribe(
        registry: &SharedListenerRegistry,
        target: ListenerTarget,
        event_type: EventType,
        owner: ElementId,
    ) -> Self {
        let id = registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on(target, event_type, owner);
        tracing::trace!(on = ?target, event_type, ?owner, "listener bound");

        Self {
            registry: Arc::downgrade(registry),
            id,
            target,
            event_type,
        }
    }

    /// Release the listener now
    pub fn off(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // The registry may already be gone if the document was dropped first
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let removed = registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .off(self.id);
        tracing::trace!(
            on = ?self.target,
            event_type = self.event_type,
            removed,
            "listener released"
        );
    }
}
