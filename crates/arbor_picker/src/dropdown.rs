//! Check-tree picker
//!
//! A searchable, collapsible dropdown whose body is a multi-select tree.
//! [`DropdownContainer`] composes the visibility controller, the value
//! reconciler and the tree filter, and exposes the entry points a host
//! routes collaborator events into.
//!
//! # Example
//!
//! ```rust
//! use arbor_core::dom::Document;
//! use arbor_core::events::Event;
//! use arbor_picker::prelude::*;
//!
//! let mut doc = Document::default();
//! let data = vec![TreeNode::branch(
//!     "Fruit",
//!     "fruit",
//!     vec![TreeNode::leaf("Apple", "apple"), TreeNode::leaf("Pear", "pear")],
//! )];
//!
//! let mut picker = check_tree_picker(data)
//!     .on_select(|node, depth, _values| println!("{:?} at {}", node.get("label"), depth))
//!     .build(&mut doc);
//! let body = doc.body();
//! picker.mount_into(&mut doc, body).unwrap();
//!
//! picker.handle_toggle(&doc, &Event::click(Some(picker.root())));
//! picker.handle_search("app", &Event::text_input(None, "app"));
//!
//! let view = picker.render();
//! assert_eq!(view.panel.unwrap().tree().unwrap().data[0].children.len(), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use arbor_core::dom::{Document, DomError, ElementId};
use arbor_core::events::Event;
use arbor_core::listeners::ListenerTarget;
use serde_json::Value;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::config::PickerConfig;
use crate::filter::filter_nodes_of_tree;
use crate::locale::Locale;
use crate::node::{walk, TreeNode};
use crate::placement::{Placement, PlacementResolver};
use crate::value::{ChangeCallback, SelectionValue, ValueReconciler};
use crate::view::{
    CheckTreeProps, DropdownView, PanelItem, PanelView, SearchBarProps, ToggleLabel, ToggleView,
};
use crate::visibility::VisibilityController;

/// Tree node selected: `(node, depth, full value)`
pub type SelectCallback = Arc<dyn Fn(&TreeNode, usize, &[Value]) + Send + Sync>;
/// Tree node expanded: `(node, depth)`
pub type ExpandCallback = Arc<dyn Fn(&TreeNode, usize) + Send + Sync>;
/// Toggle activated
pub type ToggleCallback = Arc<dyn Fn(&Event) + Send + Sync>;
/// Search keyword changed
pub type SearchCallback = Arc<dyn Fn(&str, &Event) + Send + Sync>;
/// Toggle text override: `(value, selected nodes, default label)`
pub type RenderPlaceholder =
    Arc<dyn Fn(&[Value], &[&TreeNode], &ToggleLabel) -> ToggleLabel + Send + Sync>;

#[derive(Clone, Default)]
struct PickerCallbacks {
    on_select: Option<SelectCallback>,
    on_expand: Option<ExpandCallback>,
    on_toggle: Option<ToggleCallback>,
    on_search: Option<SearchCallback>,
}

/// Inputs a parent may replace after construction
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PickerProps {
    pub data: Vec<TreeNode>,
    pub value: Option<SelectionValue>,
    pub dropup: Option<bool>,
    pub expand: bool,
    pub disabled: bool,
}

/// Searchable check-tree dropdown
pub struct DropdownContainer {
    root: ElementId,
    config: PickerConfig,
    locale: Locale,
    /// Last props received; `props.data` is the tree being rendered
    props: PickerProps,
    value: ValueReconciler,
    visibility: VisibilityController,
    search_keyword: String,
    callbacks: PickerCallbacks,
    render_placeholder: Option<RenderPlaceholder>,
}

impl fmt::Debug for DropdownContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropdownContainer")
            .field("root", &self.root)
            .field("config", &self.config)
            .field("value", &self.value)
            .field("visibility", &self.visibility)
            .field("search_keyword", &self.search_keyword)
            .finish_non_exhaustive()
    }
}

impl DropdownContainer {
    /// Root element; the anchor for placement and the dismissal boundary
    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn data(&self) -> &[TreeNode] {
        &self.props.data
    }

    pub fn is_controlled(&self) -> bool {
        self.value.is_controlled()
    }

    /// Authoritative selection (owned copy)
    pub fn current_value(&self) -> SelectionValue {
        self.value.current_value()
    }

    pub fn search_keyword(&self) -> &str {
        &self.search_keyword
    }

    pub fn is_expanded(&self) -> bool {
        self.visibility.is_expanded()
    }

    pub fn is_mounted(&self) -> bool {
        self.visibility.is_mounted()
    }

    pub fn placement(&self) -> Placement {
        self.visibility.placement()
    }

    /// Global listeners currently held by this picker
    pub fn listener_count(&self) -> usize {
        self.visibility.listener_count()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Mark the picker live once its root is in the document
    pub fn mount(&mut self, doc: &Document) {
        trace!(root = ?self.root, "mount");
        self.visibility.mount(doc);
    }

    /// Attach the root under `parent` and mount
    pub fn mount_into(&mut self, doc: &mut Document, parent: ElementId) -> Result<(), DomError> {
        doc.append_child(parent, self.root)?;
        self.mount(doc);
        Ok(())
    }

    /// Stop reacting and release every global listener
    pub fn unmount(&mut self) {
        trace!(root = ?self.root, "unmount");
        self.visibility.unmount();
    }

    /// Unmount and destroy the root element
    pub fn teardown(mut self, doc: &mut Document) -> Result<(), DomError> {
        self.unmount();
        doc.remove(self.root)
    }

    // =========================================================================
    // Derived state
    // =========================================================================

    /// Whether `node` passes the current search keyword
    ///
    /// A blank keyword shows everything; otherwise the keyword must occur,
    /// case-insensitively, in the node's flattened label text.
    pub fn should_display(&self, node: &TreeNode) -> bool {
        let keyword = self.search_keyword.trim();
        if keyword.is_empty() {
            return true;
        }
        node.label(&self.config.label_key)
            .contains_ignore_case(&self.search_keyword)
    }

    /// The tree narrowed by the search keyword
    pub fn filtered_data(&self) -> Vec<TreeNode> {
        filter_nodes_of_tree(&self.props.data, |node| self.should_display(node))
    }

    /// Nodes anywhere in the tree whose value is selected
    pub fn selected_nodes(&self) -> Vec<&TreeNode> {
        let selected = self.value.working_value();
        let value_key = &self.config.value_key;
        let mut nodes = Vec::new();
        walk(&self.props.data, &mut |node, _| {
            if node.value(value_key).is_some_and(|v| selected.contains(v)) {
                nodes.push(node);
            }
        });
        nodes
    }

    /// Text for the toggle
    pub fn toggle_label(&self) -> ToggleLabel {
        let value = self.value.working_value();
        let default = if value.is_empty() {
            ToggleLabel::Placeholder(self.locale.format(&self.config.placeholder))
        } else {
            ToggleLabel::Summary(format!("{} selected", value.len()))
        };

        match &self.render_placeholder {
            Some(render) => render(value, &self.selected_nodes(), &default),
            None => default,
        }
    }

    /// Describe the picker for the host to draw
    pub fn render(&self) -> DropdownView {
        let expanded = self.is_expanded();
        let placement = self.placement();
        let disabled = self.visibility.is_disabled();

        let mut classes = vec!["dropdown"];
        if placement.is_up() {
            classes.push("dropup");
        }
        if disabled {
            classes.push("disabled");
        }
        if self.config.inverse {
            classes.push("inverse");
        }
        if expanded {
            classes.push("expand");
        }

        let toggle = ToggleView {
            label: self.toggle_label(),
            cleanable: self.config.cleanable && !disabled,
            has_value: !self.value.working_value().is_empty(),
            disabled,
        };

        DropdownView {
            role: "menu",
            classes,
            toggle,
            panel: expanded.then(|| self.render_panel(placement)),
        }
    }

    fn render_panel(&self, placement: Placement) -> PanelView {
        let tree = PanelItem::Tree(CheckTreeProps {
            data: self.filtered_data(),
            value: self.value.current_value(),
            label_key: self.config.label_key.clone(),
            value_key: self.config.value_key.clone(),
            no_results_text: self.locale.format("noResultsText"),
        });
        let search_bar = self.config.searchable.then(|| {
            PanelItem::SearchBar(SearchBarProps {
                value: self.search_keyword.clone(),
                placeholder: self.locale.format("searchPlaceholder"),
            })
        });

        // The search bar stays next to the toggle whichever way the panel opens
        let mut items: SmallVec<[PanelItem; 2]> = SmallVec::new();
        match placement {
            Placement::Down => {
                items.extend(search_bar);
                items.push(tree);
            }
            Placement::Up => {
                items.push(tree);
                items.extend(search_bar);
            }
        }

        PanelView { placement, items }
    }

    // =========================================================================
    // Event entry points
    // =========================================================================

    /// Toggle button activated. Ignored entirely while disabled.
    pub fn handle_toggle(&mut self, doc: &Document, event: &Event) -> bool {
        let changed = self.visibility.toggle(doc);
        if changed {
            if let Some(on_toggle) = &self.callbacks.on_toggle {
                on_toggle(event);
            }
        }
        changed
    }

    /// Document/window event delivered through the listener registry
    pub fn handle_global_event(
        &mut self,
        doc: &Document,
        target: ListenerTarget,
        event: &Event,
    ) -> bool {
        self.visibility.handle_global_event(doc, target, event)
    }

    /// Search input changed
    pub fn handle_search(&mut self, keyword: impl Into<String>, event: &Event) {
        self.search_keyword = keyword.into();
        debug!(root = ?self.root, keyword = %self.search_keyword, "search");
        if let Some(on_search) = &self.callbacks.on_search {
            on_search(&self.search_keyword, event);
        }
    }

    /// Clear affordance activated
    pub fn handle_clean(&mut self) {
        if !self.config.cleanable || self.visibility.is_disabled() {
            trace!(root = ?self.root, "clean ignored");
            return;
        }
        debug!(root = ?self.root, "clean");
        self.value.clear();
    }

    /// The tree widget reported a new selection
    pub fn handle_tree_change(&mut self, values: SelectionValue) {
        debug!(root = ?self.root, len = values.len(), "tree change");
        self.value.apply_change(values);
    }

    /// The tree widget reported a node selection
    pub fn handle_tree_select(&self, node: &TreeNode, depth: usize, values: &[Value]) {
        if let Some(on_select) = &self.callbacks.on_select {
            on_select(node, depth, values);
        }
    }

    /// The tree widget reported a node expansion
    pub fn handle_tree_expand(&self, node: &TreeNode, depth: usize) {
        if let Some(on_expand) = &self.callbacks.on_expand {
            on_expand(node, depth);
        }
    }

    /// The parent re-rendered with new props
    ///
    /// Each prop is compared structurally with the previous one; only real
    /// changes touch state. Returns whether anything was replaced.
    pub fn update_props(&mut self, doc: &Document, next: PickerProps) -> bool {
        let mut changed = false;

        if next.data != self.props.data {
            debug!(root = ?self.root, "data replaced");
            changed = true;
        }

        changed |= self.value.reconcile(next.value.as_deref());

        if next.dropup != self.props.dropup {
            let resolver = PlacementResolver::from_options(
                next.dropup,
                self.config.auto_adjust_position,
                self.config.height,
            );
            self.visibility.set_explicit_placement(resolver.explicit());
            self.config.dropup = next.dropup;
            changed = true;
        }

        if next.disabled != self.props.disabled {
            self.visibility.set_disabled(next.disabled);
            self.config.disabled = next.disabled;
            changed = true;
        }

        if next.expand != self.props.expand {
            self.visibility.set_expanded(doc, next.expand);
            changed = true;
        }

        self.props = next;
        changed
    }
}

impl Drop for DropdownContainer {
    fn drop(&mut self) {
        self.visibility.unmount();
    }
}

/// Start building a check-tree picker over `data`
pub fn check_tree_picker(data: Vec<TreeNode>) -> CheckTreePickerBuilder {
    CheckTreePickerBuilder {
        config: PickerConfig::default(),
        data,
        value: None,
        default_value: None,
        on_change: None,
        locale: Locale::default(),
        callbacks: PickerCallbacks::default(),
        render_placeholder: None,
    }
}

/// Builder for [`DropdownContainer`]
pub struct CheckTreePickerBuilder {
    config: PickerConfig,
    data: Vec<TreeNode>,
    value: Option<SelectionValue>,
    default_value: Option<SelectionValue>,
    on_change: Option<ChangeCallback>,
    locale: Locale,
    callbacks: PickerCallbacks,
    render_placeholder: Option<RenderPlaceholder>,
}

impl CheckTreePickerBuilder {
    /// Replace all plain options at once
    pub fn config(mut self, config: PickerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn expand(mut self, expand: bool) -> Self {
        self.config.expand = expand;
        self
    }

    pub fn dropup(mut self, dropup: bool) -> Self {
        self.config.dropup = Some(dropup);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.config.disabled = disabled;
        self
    }

    pub fn inverse(mut self, inverse: bool) -> Self {
        self.config.inverse = inverse;
        self
    }

    pub fn searchable(mut self, searchable: bool) -> Self {
        self.config.searchable = searchable;
        self
    }

    /// Locale message id for the empty-selection text
    pub fn placeholder(mut self, id: impl Into<String>) -> Self {
        self.config.placeholder = id.into();
        self
    }

    pub fn cleanable(mut self, cleanable: bool) -> Self {
        self.config.cleanable = cleanable;
        self
    }

    /// Panel height used for placement (default: 320.0)
    pub fn height(mut self, height: f32) -> Self {
        self.config.height = height;
        self
    }

    pub fn auto_adjust_position(mut self, auto: bool) -> Self {
        self.config.auto_adjust_position = auto;
        self
    }

    pub fn label_key(mut self, key: impl Into<String>) -> Self {
        self.config.label_key = key.into();
        self
    }

    pub fn value_key(mut self, key: impl Into<String>) -> Self {
        self.config.value_key = key.into();
        self
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Selection value. Together with `on_change` this makes the picker
    /// controlled; alone it seeds an uncontrolled picker.
    pub fn value(mut self, value: SelectionValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Initial selection of an uncontrolled picker. Ignored when `value` is set.
    pub fn default_value(mut self, value: SelectionValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(callback));
        self
    }

    pub fn on_select<F>(mut self, callback: F) -> Self
    where
        F: Fn(&TreeNode, usize, &[Value]) + Send + Sync + 'static,
    {
        self.callbacks.on_select = Some(Arc::new(callback));
        self
    }

    pub fn on_expand<F>(mut self, callback: F) -> Self
    where
        F: Fn(&TreeNode, usize) + Send + Sync + 'static,
    {
        self.callbacks.on_expand = Some(Arc::new(callback));
        self
    }

    pub fn on_toggle<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.callbacks.on_toggle = Some(Arc::new(callback));
        self
    }

    pub fn on_search<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, &Event) + Send + Sync + 'static,
    {
        self.callbacks.on_search = Some(Arc::new(callback));
        self
    }

    /// Override the toggle text
    pub fn render_placeholder<F>(mut self, render: F) -> Self
    where
        F: Fn(&[Value], &[&TreeNode], &ToggleLabel) -> ToggleLabel + Send + Sync + 'static,
    {
        self.render_placeholder = Some(Arc::new(render));
        self
    }

    /// Create the picker and its (detached) root element
    pub fn build(self, doc: &mut Document) -> DropdownContainer {
        let root = doc.create_element();
        let config = self.config;

        let resolver = PlacementResolver::from_options(
            config.dropup,
            config.auto_adjust_position,
            config.height,
        );
        let mut visibility = VisibilityController::new(doc, root, config.expand, resolver);
        visibility.set_disabled(config.disabled);

        let mut value = ValueReconciler::from_options(self.value.clone(), self.on_change);
        if let (None, Some(default)) = (&self.value, self.default_value) {
            value.seed(default);
        }
        debug!(?root, controlled = value.is_controlled(), "picker created");

        DropdownContainer {
            root,
            props: PickerProps {
                data: self.data,
                value: self.value,
                dropup: config.dropup,
                expand: config.expand,
                disabled: config.disabled,
            },
            config,
            locale: self.locale,
            value,
            visibility,
            search_keyword: String::new(),
            callbacks: self.callbacks,
            render_placeholder: self.render_placeholder,
        }
    }
}
