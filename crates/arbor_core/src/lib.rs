//! Arbor Core
//!
//! Foundational primitives shared by Arbor widgets:
//!
//! - **Geometry**: points, sizes and rectangles used for placement math
//! - **Events**: platform-neutral event payloads and type ids
//! - **Listeners**: a global document/window listener registry with scoped
//!   subscriptions that release themselves on drop
//! - **Document**: a minimal element tree carrying layout bounds and the
//!   viewport size, used for containment tests and geometry reads
//! - **State Machines**: table-driven FSMs for widget interaction states
//!
//! # Example
//!
//! ```rust
//! use arbor_core::dom::Document;
//! use arbor_core::events::event_types;
//! use arbor_core::listeners::{ListenerTarget, Subscription};
//! use arbor_core::geometry::Size;
//!
//! let mut doc = Document::new(Size::new(800.0, 600.0));
//! let el = doc.create_element();
//! doc.append_child(doc.body(), el).unwrap();
//!
//! let sub = Subscription::subscribe(
//!     &doc.listeners(),
//!     ListenerTarget::Document,
//!     event_types::CLICK,
//!     el,
//! );
//! assert_eq!(doc.listener_count(el), 1);
//!
//! drop(sub);
//! assert_eq!(doc.listener_count(el), 0);
//! ```

pub mod dom;
pub mod events;
pub mod fsm;
pub mod geometry;
pub mod listeners;

pub use dom::{Document, DomError, ElementId};
pub use events::{event_types, Event, EventData, EventType};
pub use fsm::{StateId, StateMachine, StateMachineBuilder, Transition};
pub use geometry::{Point, Rect, Size};
pub use listeners::{
    ListenerId, ListenerRegistry, ListenerTarget, SharedListenerRegistry, Subscription,
};
