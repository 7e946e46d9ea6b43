//! Scripted interaction
//!
//! A script is a TOML file describing where the picker sits and a list of
//! steps to replay against it:
//!
//! ```toml
//! viewport = { width = 800.0, height = 600.0 }
//! anchor = { x = 0.0, y = 560.0, width = 240.0, height = 32.0 }
//!
//! [[step]]
//! action = "toggle"
//!
//! [[step]]
//! action = "search"
//! keyword = "app"
//!
//! [[step]]
//! action = "click_outside"
//! ```

use anyhow::{Context, Result};
use arbor_core::dom::{Document, ElementId};
use arbor_core::events::Event;
use arbor_core::geometry::{Rect, Size};
use arbor_core::listeners::ListenerTarget;
use arbor_picker::dropdown::{check_tree_picker, DropdownContainer, PickerProps};
use arbor_picker::{Locale, PickerConfig, TreeNode};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
pub struct Script {
    #[serde(default = "default_viewport")]
    pub viewport: ViewportSpec,
    #[serde(default = "default_anchor")]
    pub anchor: AnchorSpec,
    /// Controlled selection; changes are then reported but not applied
    #[serde(default)]
    pub value: Option<Vec<Value>>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct ViewportSpec {
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct AnchorSpec {
    #[serde(default)]
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_anchor_width")]
    pub width: f32,
    #[serde(default = "default_anchor_height")]
    pub height: f32,
}

fn default_viewport() -> ViewportSpec {
    ViewportSpec {
        width: 1280.0,
        height: 800.0,
    }
}

fn default_anchor() -> AnchorSpec {
    AnchorSpec {
        x: 0.0,
        y: 0.0,
        width: default_anchor_width(),
        height: default_anchor_height(),
    }
}

fn default_anchor_width() -> f32 {
    240.0
}

fn default_anchor_height() -> f32 {
    32.0
}

impl From<AnchorSpec> for Rect {
    fn from(a: AnchorSpec) -> Self {
        Rect::new(a.x, a.y, a.width, a.height)
    }
}

/// One scripted interaction
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Toggle,
    Search { keyword: String },
    /// The tree reports a new selection
    Change { values: Vec<Value> },
    Clean,
    ClickInside,
    ClickOutside,
    /// Page scrolled so the anchor now starts at `y`
    Scroll { y: f32 },
    Resize { width: f32, height: f32 },
    /// Parent re-rendered with a new `expand` prop
    Expand { expand: bool },
}

impl Script {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).context("Failed to parse script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&source).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// A picker mounted in a throwaway document, plus a sibling element to click
/// on for outside clicks
pub struct Simulation {
    pub doc: Document,
    pub picker: DropdownContainer,
    outside: ElementId,
    anchor: Rect,
    /// Controlled value the parent keeps passing on re-render
    value: Option<Vec<Value>>,
}

impl Simulation {
    pub fn new(
        data: Vec<TreeNode>,
        config: PickerConfig,
        locale: Locale,
        script: &Script,
    ) -> Result<Self> {
        let mut doc = Document::new(Size::new(script.viewport.width, script.viewport.height));
        let mut builder = check_tree_picker(data).config(config).locale(locale);
        if let Some(value) = &script.value {
            builder = builder
                .value(value.clone())
                .on_change(|values| {
                    let values = serde_json::Value::from(values.to_vec());
                    info!(%values, "on_change");
                });
        }
        let mut picker = builder
            .on_toggle(|_| debug!("on_toggle"))
            .on_search(|keyword, _| debug!(keyword, "on_search"))
            .build(&mut doc);

        let anchor = Rect::from(script.anchor);
        let body = doc.body();
        doc.set_bounds(picker.root(), anchor)?;
        picker.mount_into(&mut doc, body)?;

        let outside = doc.create_element();
        doc.append_child(body, outside)?;

        Ok(Self {
            doc,
            picker,
            outside,
            anchor,
            value: script.value.clone(),
        })
    }

    pub fn step(&mut self, step: &Step) -> Result<()> {
        debug!(?step, "step");
        match step {
            Step::Toggle => {
                let event = Event::click(Some(self.picker.root()));
                self.picker.handle_toggle(&self.doc, &event);
            }
            Step::Search { keyword } => {
                let event = Event::text_input(Some(self.picker.root()), keyword.clone());
                self.picker.handle_search(keyword.clone(), &event);
            }
            Step::Change { values } => self.picker.handle_tree_change(values.clone()),
            Step::Clean => self.picker.handle_clean(),
            Step::ClickInside => {
                self.dispatch(ListenerTarget::Document, Event::click(Some(self.picker.root())))
            }
            Step::ClickOutside => {
                self.dispatch(ListenerTarget::Document, Event::click(Some(self.outside)))
            }
            Step::Scroll { y } => {
                let delta = *y - self.anchor.top();
                self.anchor = self.anchor.offset(0.0, delta);
                self.doc.set_bounds(self.picker.root(), self.anchor)?;
                self.dispatch(ListenerTarget::Document, Event::scroll(delta));
            }
            Step::Resize { width, height } => {
                self.doc.set_viewport(Size::new(*width, *height));
                self.dispatch(ListenerTarget::Window, Event::resize(*width, *height));
            }
            Step::Expand { expand } => {
                let props = PickerProps {
                    data: self.picker.data().to_vec(),
                    value: self.value.clone(),
                    dropup: self.picker.config().dropup,
                    expand: *expand,
                    disabled: self.picker.config().disabled,
                };
                self.picker.update_props(&self.doc, props);
            }
        }
        Ok(())
    }

    /// Deliver a global event to every owner listening for it
    fn dispatch(&mut self, target: ListenerTarget, event: Event) {
        let owners = self.doc.dispatch_targets(target, event.event_type);
        if owners.contains(&self.picker.root()) {
            self.picker.handle_global_event(&self.doc, target, &event);
        } else {
            debug!(?target, event_type = event.event_type, "no listener");
        }
    }
}
