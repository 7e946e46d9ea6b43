//! Expand/collapse lifecycle
//!
//! The controller is a two-state FSM (`COLLAPSED`, `EXPANDED`). Entering
//! `EXPANDED` acquires three global listeners (document click for dismissal,
//! document scroll and window resize for reflow) and resolves placement once.
//! Leaving it drops the listener set, releasing each listener individually.
//!
//! Listeners are only acquired while the picker is mounted, and unmounting
//! releases them even if the panel is still open.

use std::sync::PoisonError;

use arbor_core::dom::{Document, ElementId};
use arbor_core::events::{event_types, Event, EventType};
use arbor_core::fsm::{StateId, StateMachine};
use arbor_core::listeners::{ListenerTarget, SharedListenerRegistry, Subscription};
use tracing::{debug, trace};

use crate::placement::{Placement, PlacementResolver};

/// Visibility states
pub mod states {
    use arbor_core::fsm::StateId;

    pub const COLLAPSED: StateId = 0;
    pub const EXPANDED: StateId = 1;
}

/// Visibility FSM triggers
pub mod triggers {
    use arbor_core::events::EventType;

    /// Toggle button activated
    pub const TOGGLE: EventType = 100;
    /// Click landed outside the picker
    pub const DISMISS: EventType = 101;
    /// Scroll or resize while open
    pub const REFLOW: EventType = 102;
}

/// The three global listeners held while expanded
#[derive(Debug)]
struct ListenerSet {
    _click: Subscription,
    _scroll: Subscription,
    _resize: Subscription,
}

impl ListenerSet {
    fn bind(registry: &SharedListenerRegistry, owner: ElementId) -> Self {
        Self {
            _click: Subscription::subscribe(
                registry,
                ListenerTarget::Document,
                event_types::CLICK,
                owner,
            ),
            _scroll: Subscription::subscribe(
                registry,
                ListenerTarget::Document,
                event_types::SCROLL,
                owner,
            ),
            _resize: Subscription::subscribe(
                registry,
                ListenerTarget::Window,
                event_types::RESIZE,
                owner,
            ),
        }
    }
}

/// Owns the expanded flag, the sticky placement and the global listeners
#[derive(Debug)]
pub struct VisibilityController {
    fsm: StateMachine,
    /// Root element: containment target for dismissal and placement anchor
    anchor: ElementId,
    registry: SharedListenerRegistry,
    listeners: Option<ListenerSet>,
    resolver: PlacementResolver,
    placement: Placement,
    disabled: bool,
    mounted: bool,
}

impl VisibilityController {
    pub fn new(
        doc: &Document,
        anchor: ElementId,
        expanded: bool,
        resolver: PlacementResolver,
    ) -> Self {
        Self {
            fsm: Self::create_fsm(expanded),
            anchor,
            registry: doc.listeners(),
            listeners: None,
            placement: resolver.explicit().unwrap_or_default(),
            resolver,
            disabled: false,
            mounted: false,
        }
    }

    fn create_fsm(expanded: bool) -> StateMachine {
        let initial = if expanded {
            states::EXPANDED
        } else {
            states::COLLAPSED
        };

        StateMachine::builder(initial)
            .on(states::COLLAPSED, triggers::TOGGLE, states::EXPANDED)
            .on(states::EXPANDED, triggers::TOGGLE, states::COLLAPSED)
            .on(states::EXPANDED, triggers::DISMISS, states::COLLAPSED)
            .on(states::EXPANDED, triggers::REFLOW, states::EXPANDED)
            .build()
    }

    pub fn anchor(&self) -> ElementId {
        self.anchor
    }

    pub fn is_expanded(&self) -> bool {
        self.fsm.current() == states::EXPANDED
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Replace the explicit placement; a concrete value applies immediately
    pub fn set_explicit_placement(&mut self, explicit: Option<Placement>) {
        self.resolver.set_explicit(explicit);
        if let Some(placement) = explicit {
            self.placement = placement;
        }
    }

    /// Mark the picker live. An initially expanded picker binds now.
    pub fn mount(&mut self, doc: &Document) {
        self.mounted = true;
        if self.is_expanded() {
            self.enter_expanded(doc);
        }
    }

    /// Mark the picker dead and release every listener
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.release_listeners();
    }

    /// Toggle action. A no-op while disabled.
    pub fn toggle(&mut self, doc: &Document) -> bool {
        if self.disabled {
            debug!(anchor = ?self.anchor, "toggle ignored: disabled");
            return false;
        }
        let transition = self.fsm.send(triggers::TOGGLE);
        self.apply(doc, transition)
    }

    /// Collapse if `target` lies outside the picker. A missing target counts
    /// as outside.
    pub fn dismiss(&mut self, doc: &Document, target: Option<ElementId>) -> bool {
        if !self.mounted {
            return false;
        }
        if target.is_some_and(|t| doc.contains(self.anchor, t)) {
            trace!(anchor = ?self.anchor, "click inside picker, not dismissing");
            return false;
        }
        let transition = self.fsm.send(triggers::DISMISS);
        self.apply(doc, transition)
    }

    /// Drive to `expanded` directly (prop-forced visibility)
    pub fn set_expanded(&mut self, doc: &Document, expanded: bool) -> bool {
        let target = if expanded {
            states::EXPANDED
        } else {
            states::COLLAPSED
        };
        let transition = self.fsm.force(target);
        self.apply(doc, transition)
    }

    /// Re-resolve placement. Returns true if the placement changed.
    ///
    /// Skipped once unmounted, and when the anchor has no geometry.
    pub fn reposition(&mut self, doc: &Document) -> bool {
        if !self.mounted {
            trace!(anchor = ?self.anchor, "reposition skipped: not mounted");
            return false;
        }
        let Some(placement) = self.resolver.resolve_in(doc, self.anchor) else {
            trace!(anchor = ?self.anchor, "reposition skipped: no geometry");
            return false;
        };

        let changed = placement != self.placement;
        if changed {
            debug!(anchor = ?self.anchor, %placement, "placement changed");
        }
        self.placement = placement;
        changed
    }

    /// Handle a document/window event routed from the listener registry
    ///
    /// Events the controller is not currently subscribed to are ignored.
    pub fn handle_global_event(
        &mut self,
        doc: &Document,
        target: ListenerTarget,
        event: &Event,
    ) -> bool {
        if !self.is_listening(target, event.event_type) {
            return false;
        }

        match event.event_type {
            event_types::CLICK => self.dismiss(doc, event.target),
            event_types::SCROLL | event_types::RESIZE => {
                if self.fsm.send(triggers::REFLOW).is_some() {
                    self.reposition(doc)
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    /// Number of global listeners currently held
    pub fn listener_count(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .count_for_owner(self.anchor)
    }

    fn is_listening(&self, target: ListenerTarget, event_type: EventType) -> bool {
        self.listeners.is_some()
            && self
                .registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .is_listening(self.anchor, target, event_type)
    }

    fn apply(&mut self, doc: &Document, transition: Option<(StateId, StateId)>) -> bool {
        match transition {
            Some((states::COLLAPSED, states::EXPANDED)) => {
                debug!(anchor = ?self.anchor, "expanded");
                self.enter_expanded(doc);
                true
            }
            Some((states::EXPANDED, states::COLLAPSED)) => {
                debug!(anchor = ?self.anchor, "collapsed");
                self.release_listeners();
                true
            }
            _ => false,
        }
    }

    fn enter_expanded(&mut self, doc: &Document) {
        if !self.mounted {
            return;
        }
        if self.listeners.is_none() {
            self.listeners = Some(ListenerSet::bind(&self.registry, self.anchor));
        }
        self.reposition(doc);
    }

    fn release_listeners(&mut self) {
        if self.listeners.take().is_some() {
            trace!(anchor = ?self.anchor, "global listeners released");
        }
    }
}
