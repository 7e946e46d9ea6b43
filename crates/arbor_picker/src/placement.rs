//! Panel placement
//!
//! Decides whether the panel opens below the anchor ([`Placement::Down`]) or
//! flips above it ([`Placement::Up`]). It flips only when the panel would
//! overflow the viewport bottom *and* fits above the anchor.

use arbor_core::dom::{Document, ElementId};
use arbor_core::geometry::Rect;
use serde::{Deserialize, Serialize};

/// Vertical orientation of the panel relative to the anchor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    #[default]
    Down,
    Up,
}

impl Placement {
    /// Map a `dropup` flag to a placement
    pub fn from_dropup(dropup: bool) -> Self {
        if dropup {
            Placement::Up
        } else {
            Placement::Down
        }
    }

    pub fn is_up(self) -> bool {
        self == Placement::Up
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Placement::Down => "down",
            Placement::Up => "up",
        }
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve placement from anchor geometry
///
/// An explicit placement always wins.
pub fn resolve(
    explicit: Option<Placement>,
    anchor: Rect,
    viewport_height: f32,
    panel_height: f32,
) -> Placement {
    if let Some(placement) = explicit {
        return placement;
    }

    if anchor.bottom() + panel_height > viewport_height && anchor.top() - panel_height > 0.0 {
        Placement::Up
    } else {
        Placement::Down
    }
}

/// Placement policy for one picker
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementResolver {
    explicit: Option<Placement>,
    panel_height: f32,
}

impl PlacementResolver {
    pub fn new(explicit: Option<Placement>, panel_height: f32) -> Self {
        Self {
            explicit,
            panel_height,
        }
    }

    /// Build from picker options
    ///
    /// With automatic adjustment off the orientation is pinned to `dropup`
    /// (down when unset), so geometry is never consulted.
    pub fn from_options(dropup: Option<bool>, auto_adjust: bool, panel_height: f32) -> Self {
        let explicit = if auto_adjust {
            dropup.map(Placement::from_dropup)
        } else {
            Some(Placement::from_dropup(dropup.unwrap_or(false)))
        };
        Self::new(explicit, panel_height)
    }

    pub fn explicit(&self) -> Option<Placement> {
        self.explicit
    }

    pub fn set_explicit(&mut self, explicit: Option<Placement>) {
        self.explicit = explicit;
    }

    pub fn panel_height(&self) -> f32 {
        self.panel_height
    }

    pub fn resolve(&self, anchor: Rect, viewport_height: f32) -> Placement {
        resolve(self.explicit, anchor, viewport_height, self.panel_height)
    }

    /// Resolve against the live document
    ///
    /// Returns `None` when the anchor has no geometry yet (not attached or
    /// not laid out); the caller keeps its previous placement.
    pub fn resolve_in(&self, doc: &Document, anchor: ElementId) -> Option<Placement> {
        if let Some(placement) = self.explicit {
            return Some(placement);
        }
        let rect = doc.bounding_client_rect(anchor)?;
        Some(self.resolve(rect, doc.inner_height()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::geometry::Size;

    const VIEWPORT: f32 = 600.0;
    const PANEL: f32 = 300.0;

    #[test]
    fn test_explicit_wins_regardless_of_geometry() {
        let cramped = Rect::new(0.0, 560.0, 200.0, 32.0);
        let roomy = Rect::new(0.0, 10.0, 200.0, 32.0);
        for anchor in [cramped, roomy] {
            assert_eq!(resolve(Some(Placement::Down), anchor, VIEWPORT, PANEL), Placement::Down);
            assert_eq!(resolve(Some(Placement::Up), anchor, VIEWPORT, PANEL), Placement::Up);
        }
    }

    #[test]
    fn test_flips_up_when_no_room_below_and_room_above() {
        let anchor = Rect::new(0.0, 500.0, 200.0, 32.0);
        assert_eq!(resolve(None, anchor, VIEWPORT, PANEL), Placement::Up);
    }

    #[test]
    fn test_stays_down_with_room_below() {
        let anchor = Rect::new(0.0, 100.0, 200.0, 32.0);
        assert_eq!(resolve(None, anchor, VIEWPORT, PANEL), Placement::Down);
    }

    #[test]
    fn test_stays_down_when_neither_side_fits() {
        let anchor = Rect::new(0.0, 280.0, 200.0, 32.0);
        assert_eq!(resolve(None, anchor, VIEWPORT, PANEL), Placement::Down);
    }

    #[test]
    fn test_boundaries_are_strict() {
        // bottom + panel == viewport: fits exactly below
        let exact_below = Rect::new(0.0, 268.0, 200.0, 32.0);
        assert_eq!(resolve(None, exact_below, VIEWPORT, PANEL), Placement::Down);

        // overflows below, but top - panel == 0: does not fit above
        let exact_above = Rect::new(0.0, 300.0, 200.0, 32.0);
        assert_eq!(resolve(None, exact_above, VIEWPORT, PANEL), Placement::Down);
    }

    #[test]
    fn test_from_options_pins_when_auto_adjust_off() {
        let pinned = PlacementResolver::from_options(None, false, PANEL);
        assert_eq!(pinned.explicit(), Some(Placement::Down));

        let pinned_up = PlacementResolver::from_options(Some(true), false, PANEL);
        assert_eq!(pinned_up.explicit(), Some(Placement::Up));

        let auto = PlacementResolver::from_options(None, true, PANEL);
        assert_eq!(auto.explicit(), None);
    }

    #[test]
    fn test_resolve_in_skips_without_geometry() {
        let mut doc = Document::new(Size::new(800.0, VIEWPORT));
        let anchor = doc.create_element();
        let resolver = PlacementResolver::new(None, PANEL);

        assert_eq!(resolver.resolve_in(&doc, anchor), None);

        doc.append_child(doc.body(), anchor).unwrap();
        doc.set_bounds(anchor, Rect::new(0.0, 540.0, 200.0, 32.0))
            .unwrap();
        assert_eq!(resolver.resolve_in(&doc, anchor), Some(Placement::Up));
    }

    #[test]
    fn test_resolve_in_explicit_needs_no_geometry() {
        let mut doc = Document::default();
        let anchor = doc.create_element();
        let resolver = PlacementResolver::new(Some(Placement::Up), PANEL);
        assert_eq!(resolver.resolve_in(&doc, anchor), Some(Placement::Up));
    }
}
