//! Platform-neutral events
//!
//! Events carry a numeric type id (see [`event_types`]), an optional target
//! element and a payload. Widgets receive them either directly (toggle
//! clicks on their own elements) or through the global listener registry
//! (document clicks, document scroll, window resize).

use crate::dom::ElementId;

/// Numeric event type id
pub type EventType = u32;

/// Well-known event type ids
pub mod event_types {
    use super::EventType;

    /// Primary-button click
    pub const CLICK: EventType = 1;
    /// Document or element scrolled
    pub const SCROLL: EventType = 2;
    /// Viewport resized
    pub const RESIZE: EventType = 3;
    /// Text typed into an input
    pub const TEXT_INPUT: EventType = 4;
}

/// Event payload
#[derive(Clone, Debug, Default, PartialEq)]
pub enum EventData {
    #[default]
    None,
    Pointer {
        x: f32,
        y: f32,
        button: u8,
    },
    Scroll {
        delta_x: f32,
        delta_y: f32,
    },
    Resize {
        width: f32,
        height: f32,
    },
    Text {
        text: String,
    },
}

/// A dispatched event
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    /// Element the event originated on; `None` for document/window level events
    pub target: Option<ElementId>,
    pub data: EventData,
}

impl Event {
    pub fn new(event_type: EventType, target: Option<ElementId>, data: EventData) -> Self {
        Self {
            event_type,
            target,
            data,
        }
    }

    /// A primary-button click on `target` (or on nothing, when `None`)
    pub fn click(target: Option<ElementId>) -> Self {
        Self::new(
            event_types::CLICK,
            target,
            EventData::Pointer {
                x: 0.0,
                y: 0.0,
                button: 0,
            },
        )
    }

    /// A document scroll
    pub fn scroll(delta_y: f32) -> Self {
        Self::new(
            event_types::SCROLL,
            None,
            EventData::Scroll {
                delta_x: 0.0,
                delta_y,
            },
        )
    }

    /// A window resize to the given viewport size
    pub fn resize(width: f32, height: f32) -> Self {
        Self::new(event_types::RESIZE, None, EventData::Resize { width, height })
    }

    /// Text typed into `target`
    pub fn text_input(target: Option<ElementId>, text: impl Into<String>) -> Self {
        Self::new(
            event_types::TEXT_INPUT,
            target,
            EventData::Text { text: text.into() },
        )
    }
}
