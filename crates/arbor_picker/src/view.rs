//! Render description
//!
//! The picker is headless: [`DropdownView`] describes what a host should
//! draw (toggle text, panel orientation, and the props handed to the search
//! bar and check-tree collaborators) in document order.

use serde_json::Value;
use smallvec::SmallVec;

use crate::node::TreeNode;
use crate::placement::Placement;

/// Text shown on the toggle
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToggleLabel {
    /// "N selected"
    Summary(String),
    /// Localized empty-selection message
    Placeholder(String),
    /// Produced by a caller-supplied renderer
    Custom(String),
}

impl ToggleLabel {
    pub fn text(&self) -> &str {
        match self {
            ToggleLabel::Summary(s) | ToggleLabel::Placeholder(s) | ToggleLabel::Custom(s) => s,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ToggleLabel::Placeholder(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToggleView {
    pub label: ToggleLabel,
    /// Whether the clear affordance is offered
    pub cleanable: bool,
    pub has_value: bool,
    pub disabled: bool,
}

/// Props for the search-input collaborator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchBarProps {
    pub value: String,
    pub placeholder: String,
}

/// Props for the check-tree collaborator
#[derive(Clone, Debug, PartialEq)]
pub struct CheckTreeProps {
    /// Filtered tree
    pub data: Vec<TreeNode>,
    pub value: Vec<Value>,
    pub label_key: String,
    pub value_key: String,
    /// Shown in place of the tree when nothing matches
    pub no_results_text: String,
}

/// One child of the panel
#[derive(Clone, Debug, PartialEq)]
pub enum PanelItem {
    SearchBar(SearchBarProps),
    Tree(CheckTreeProps),
}

/// The expanded panel
#[derive(Clone, Debug, PartialEq)]
pub struct PanelView {
    pub placement: Placement,
    /// Children in document order
    pub items: SmallVec<[PanelItem; 2]>,
}

impl PanelView {
    pub fn search_bar(&self) -> Option<&SearchBarProps> {
        self.items.iter().find_map(|item| match item {
            PanelItem::SearchBar(props) => Some(props),
            PanelItem::Tree(_) => None,
        })
    }

    pub fn tree(&self) -> Option<&CheckTreeProps> {
        self.items.iter().find_map(|item| match item {
            PanelItem::Tree(props) => Some(props),
            PanelItem::SearchBar(_) => None,
        })
    }

    pub fn search_bar_index(&self) -> Option<usize> {
        self.items
            .iter()
            .position(|item| matches!(item, PanelItem::SearchBar(_)))
    }

    pub fn tree_index(&self) -> Option<usize> {
        self.items
            .iter()
            .position(|item| matches!(item, PanelItem::Tree(_)))
    }
}

/// Everything a host needs to draw the picker
#[derive(Clone, Debug, PartialEq)]
pub struct DropdownView {
    pub role: &'static str,
    /// State classes (`dropdown`, `dropup`, `disabled`, `inverse`, `expand`)
    pub classes: Vec<&'static str>,
    pub toggle: ToggleView,
    /// Present only while expanded
    pub panel: Option<PanelView>,
}

impl DropdownView {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(&class)
    }
}
