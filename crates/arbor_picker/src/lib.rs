//! Arbor Check-Tree Picker
//!
//! A searchable, collapsible dropdown whose body is a multi-select tree.
//!
//! - **Filtering**: [`filter_nodes_of_tree`] keeps matching nodes plus the
//!   ancestors needed to reach them
//! - **Placement**: [`PlacementResolver`] opens the panel upward when there
//!   is no room below
//! - **Visibility**: [`VisibilityController`] owns expand/collapse and the
//!   global listeners that dismiss and reflow the panel
//! - **Value**: [`ValueReconciler`] handles controlled and uncontrolled
//!   selections
//! - **Container**: [`DropdownContainer`] composes the above and describes
//!   what to draw via [`DropdownView`]
//!
//! The picker is headless. A host owns the [`arbor_core::Document`], routes
//! collaborator events into the `handle_*` entry points and draws the view.
//!
//! ```rust
//! use arbor_core::dom::Document;
//! use arbor_picker::prelude::*;
//! use serde_json::json;
//!
//! let mut doc = Document::default();
//! let data = parse_tree(r#"[{"label": "Fruit", "value": "fruit"}]"#).unwrap();
//! let mut picker = check_tree_picker(data).value(vec![json!("fruit")]).build(&mut doc);
//!
//! assert_eq!(picker.toggle_label().text(), "1 selected");
//! picker.handle_clean();
//! assert_eq!(picker.toggle_label().text(), "Select");
//! ```

pub mod config;
pub mod dropdown;
pub mod error;
pub mod filter;
pub mod locale;
pub mod node;
pub mod placement;
pub mod value;
pub mod view;
pub mod visibility;

pub use config::PickerConfig;
pub use dropdown::{
    check_tree_picker, CheckTreePickerBuilder, DropdownContainer, ExpandCallback, PickerProps,
    RenderPlaceholder, SearchCallback, SelectCallback, ToggleCallback,
};
pub use error::{PickerError, Result};
pub use filter::filter_nodes_of_tree;
pub use locale::Locale;
pub use node::{load_tree, parse_tree, walk, Label, TreeNode};
pub use placement::{resolve, Placement, PlacementResolver};
pub use value::{ChangeCallback, SelectionValue, ValueOwnership, ValueReconciler};
pub use view::{
    CheckTreeProps, DropdownView, PanelItem, PanelView, SearchBarProps, ToggleLabel, ToggleView,
};
pub use visibility::VisibilityController;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::PickerConfig;
    pub use crate::dropdown::{check_tree_picker, DropdownContainer, PickerProps};
    pub use crate::locale::Locale;
    pub use crate::node::{parse_tree, TreeNode};
    pub use crate::placement::Placement;
    pub use crate::view::{DropdownView, ToggleLabel};
}
