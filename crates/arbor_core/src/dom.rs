//! Minimal document model
//!
//! [`Document`] stands in for the host's element tree. It tracks parent/child
//! links, whether an element is attached below the body, the layout bounds a
//! host has measured for it, and the viewport size. Widgets use it for two
//! things only: containment tests (`contains`) and geometry reads
//! (`bounding_client_rect`, `inner_height`).
//!
//! It also owns the shared [`ListenerRegistry`] through which widgets
//! register document and window listeners.

use std::sync::PoisonError;

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use thiserror::Error;

use crate::events::EventType;
use crate::geometry::{Rect, Size};
use crate::listeners::{ListenerRegistry, ListenerTarget, SharedListenerRegistry};

new_key_type! {
    /// Unique identifier for an element
    pub struct ElementId;
}

/// Errors from document mutations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomError {
    #[error("unknown element {0:?}")]
    UnknownElement(ElementId),
    #[error("cannot append {child:?} inside its own subtree")]
    Cycle { child: ElementId },
}

#[derive(Debug, Default)]
struct ElementData {
    parent: Option<ElementId>,
    children: SmallVec<[ElementId; 4]>,
    bounds: Option<Rect>,
    attached: bool,
}

/// Element tree with viewport and global listeners
#[derive(Debug)]
pub struct Document {
    body: ElementId,
    elements: SlotMap<ElementId, ElementData>,
    viewport: Size,
    listeners: SharedListenerRegistry,
}

impl Document {
    /// Create a document whose body fills a viewport of the given size
    pub fn new(viewport: Size) -> Self {
        let mut elements = SlotMap::with_key();
        let body = elements.insert(ElementData {
            bounds: Some(viewport.to_rect()),
            attached: true,
            ..Default::default()
        });

        Self {
            body,
            elements,
            viewport,
            listeners: ListenerRegistry::shared(),
        }
    }

    /// The root element; always attached
    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Create a detached element
    pub fn create_element(&mut self) -> ElementId {
        self.elements.insert(ElementData::default())
    }

    /// Append `child` under `parent`, detaching it from any previous parent
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), DomError> {
        if !self.elements.contains_key(parent) {
            return Err(DomError::UnknownElement(parent));
        }
        if !self.elements.contains_key(child) {
            return Err(DomError::UnknownElement(child));
        }
        if self.contains(child, parent) {
            return Err(DomError::Cycle { child });
        }

        self.unlink(child);
        if let Some(data) = self.elements.get_mut(parent) {
            data.children.push(child);
        }
        if let Some(data) = self.elements.get_mut(child) {
            data.parent = Some(parent);
        }

        let attached = self.is_attached(parent);
        self.set_attached(child, attached);
        Ok(())
    }

    /// Detach `id` (and its subtree) from the document without destroying it
    pub fn detach(&mut self, id: ElementId) -> Result<(), DomError> {
        if !self.elements.contains_key(id) {
            return Err(DomError::UnknownElement(id));
        }
        if id == self.body {
            return Ok(());
        }
        self.unlink(id);
        self.set_attached(id, false);
        Ok(())
    }

    /// Destroy `id` and its subtree
    pub fn remove(&mut self, id: ElementId) -> Result<(), DomError> {
        self.detach(id)?;
        if id == self.body {
            return Ok(());
        }
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(data) = self.elements.remove(next) {
                stack.extend(data.children);
            }
        }
        Ok(())
    }

    /// Record layout bounds measured by the host
    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) -> Result<(), DomError> {
        let data = self
            .elements
            .get_mut(id)
            .ok_or(DomError::UnknownElement(id))?;
        data.bounds = Some(bounds);
        Ok(())
    }

    /// Forget layout bounds (e.g. the element was hidden)
    pub fn clear_bounds(&mut self, id: ElementId) -> Result<(), DomError> {
        let data = self
            .elements
            .get_mut(id)
            .ok_or(DomError::UnknownElement(id))?;
        data.bounds = None;
        Ok(())
    }

    /// Viewport-relative bounds of an attached, laid-out element
    ///
    /// Returns `None` when the element is unknown, detached, or has not been
    /// laid out yet.
    pub fn bounding_client_rect(&self, id: ElementId) -> Option<Rect> {
        let data = self.elements.get(id)?;
        if !data.attached {
            return None;
        }
        data.bounds
    }

    /// Whether `node` is `ancestor` or one of its descendants
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.elements.get(id).and_then(|d| d.parent);
        }
        false
    }

    pub fn exists(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    pub fn is_attached(&self, id: ElementId) -> bool {
        self.elements.get(id).is_some_and(|d| d.attached)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements.get(id).and_then(|d| d.parent)
    }

    /// Viewport height, the `innerHeight` used by placement math
    pub fn inner_height(&self) -> f32 {
        self.viewport.height
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        if let Some(body) = self.elements.get_mut(self.body) {
            body.bounds = Some(viewport.to_rect());
        }
    }

    /// Shared listener registry for this document
    pub fn listeners(&self) -> SharedListenerRegistry {
        self.listeners.clone()
    }

    /// Number of global listeners currently held by `owner`
    pub fn listener_count(&self, owner: ElementId) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .count_for_owner(owner)
    }

    /// Owners that should receive `event_type` dispatched on `target`
    pub fn dispatch_targets(
        &self,
        target: ListenerTarget,
        event_type: EventType,
    ) -> SmallVec<[ElementId; 4]> {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .owners_for(target, event_type)
    }

    fn unlink(&mut self, child: ElementId) {
        let Some(old_parent) = self.elements.get(child).and_then(|d| d.parent) else {
            return;
        };
        if let Some(data) = self.elements.get_mut(old_parent) {
            data.children.retain(|c| *c != child);
        }
        if let Some(data) = self.elements.get_mut(child) {
            data.parent = None;
        }
    }

    fn set_attached(&mut self, id: ElementId, attached: bool) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(data) = self.elements.get_mut(next) {
                data.attached = attached;
                stack.extend(data.children.iter().copied());
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Size::new(1280.0, 800.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::event_types;
    use crate::listeners::Subscription;

    #[test]
    fn test_append_and_contains() {
        let mut doc = Document::default();
        let root = doc.create_element();
        let toggle = doc.create_element();
        let outside = doc.create_element();

        doc.append_child(doc.body(), root).unwrap();
        doc.append_child(root, toggle).unwrap();
        doc.append_child(doc.body(), outside).unwrap();

        assert!(doc.contains(root, root));
        assert!(doc.contains(root, toggle));
        assert!(!doc.contains(root, outside));
        assert!(doc.contains(doc.body(), toggle));
        assert_eq!(doc.parent(toggle), Some(root));
    }

    #[test]
    fn test_attachment_follows_parent() {
        let mut doc = Document::default();
        let root = doc.create_element();
        let child = doc.create_element();
        doc.append_child(root, child).unwrap();
        assert!(!doc.is_attached(child));

        doc.append_child(doc.body(), root).unwrap();
        assert!(doc.is_attached(child));

        doc.detach(root).unwrap();
        assert!(!doc.is_attached(root));
        assert!(!doc.is_attached(child));
    }

    #[test]
    fn test_bounding_rect_requires_attachment_and_layout() {
        let mut doc = Document::default();
        let el = doc.create_element();
        doc.set_bounds(el, Rect::new(0.0, 100.0, 200.0, 32.0)).unwrap();
        assert_eq!(doc.bounding_client_rect(el), None);

        doc.append_child(doc.body(), el).unwrap();
        assert_eq!(
            doc.bounding_client_rect(el),
            Some(Rect::new(0.0, 100.0, 200.0, 32.0))
        );

        doc.clear_bounds(el).unwrap();
        assert_eq!(doc.bounding_client_rect(el), None);
    }

    #[test]
    fn test_append_rejects_cycles_and_unknown() {
        let mut doc = Document::default();
        let a = doc.create_element();
        let b = doc.create_element();
        doc.append_child(a, b).unwrap();

        assert_eq!(doc.append_child(b, a), Err(DomError::Cycle { child: a }));

        doc.remove(b).unwrap();
        assert_eq!(doc.append_child(a, b), Err(DomError::UnknownElement(b)));
        assert_eq!(doc.set_bounds(b, Rect::ZERO), Err(DomError::UnknownElement(b)));
    }

    #[test]
    fn test_remove_destroys_subtree() {
        let mut doc = Document::default();
        let a = doc.create_element();
        let b = doc.create_element();
        doc.append_child(doc.body(), a).unwrap();
        doc.append_child(a, b).unwrap();

        doc.remove(a).unwrap();
        assert!(!doc.exists(a));
        assert!(!doc.exists(b));
    }

    #[test]
    fn test_set_viewport_resizes_body() {
        let mut doc = Document::new(Size::new(800.0, 600.0));
        assert_eq!(doc.inner_height(), 600.0);

        doc.set_viewport(Size::new(800.0, 400.0));
        assert_eq!(doc.inner_height(), 400.0);
        assert_eq!(
            doc.bounding_client_rect(doc.body()),
            Some(Rect::new(0.0, 0.0, 800.0, 400.0))
        );
    }

    #[test]
    fn test_dispatch_targets() {
        let mut doc = Document::default();
        let el = doc.create_element();
        let _sub = Subscription::subscribe(
            &doc.listeners(),
            ListenerTarget::Window,
            event_types::RESIZE,
            el,
        );

        assert_eq!(
            doc.dispatch_targets(ListenerTarget::Window, event_types::RESIZE)
                .as_slice(),
            &[el]
        );
        assert_eq!(doc.listener_count(el), 1);
    }
}
