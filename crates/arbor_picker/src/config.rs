//! Picker configuration
//!
//! The plain (non-callback) options of a picker. Every field has a default,
//! so a TOML file only needs to name what it changes:
//!
//! ```toml
//! searchable = true
//! height = 240.0
//! label_key = "name"
//! value_key = "id"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{read_to_string, Result};

/// Options recognized by the check-tree picker
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PickerConfig {
    /// Start expanded
    #[serde(default)]
    pub expand: bool,
    /// Explicit orientation; `None` lets geometry decide
    #[serde(default)]
    pub dropup: Option<bool>,
    #[serde(default)]
    pub disabled: bool,
    /// Inverted color scheme flag, reflected in the view classes
    #[serde(default)]
    pub inverse: bool,
    /// Show the search bar
    #[serde(default = "default_true")]
    pub searchable: bool,
    /// Locale message id for the empty-selection text
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    /// Offer a clear affordance on the toggle
    #[serde(default = "default_true")]
    pub cleanable: bool,
    /// Panel height used by placement math
    #[serde(default = "default_height")]
    pub height: f32,
    /// Flip based on geometry; when off the orientation follows `dropup`
    #[serde(default = "default_true")]
    pub auto_adjust_position: bool,
    #[serde(default = "default_label_key")]
    pub label_key: String,
    #[serde(default = "default_value_key")]
    pub value_key: String,
}

fn default_true() -> bool {
    true
}

fn default_placeholder() -> String {
    "placeholder".to_string()
}

fn default_height() -> f32 {
    320.0
}

fn default_label_key() -> String {
    "label".to_string()
}

fn default_value_key() -> String {
    "value".to_string()
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            expand: false,
            dropup: None,
            disabled: false,
            inverse: false,
            searchable: true,
            placeholder: default_placeholder(),
            cleanable: true,
            height: default_height(),
            auto_adjust_position: true,
            label_key: default_label_key(),
            value_key: default_value_key(),
        }
    }
}

impl PickerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&read_to_string(path.as_ref())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(PickerConfig::from_toml_str("").unwrap(), PickerConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = PickerConfig::from_toml_str(
            r#"
            dropup = true
            searchable = false
            height = 200.0
            label_key = "name"
            "#,
        )
        .unwrap();

        assert_eq!(config.dropup, Some(true));
        assert!(!config.searchable);
        assert_eq!(config.height, 200.0);
        assert_eq!(config.label_key, "name");
        assert_eq!(config.value_key, "value");
        assert!(config.cleanable);
        assert!(config.auto_adjust_position);
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        assert!(PickerConfig::from_toml_str("height = \"tall\"").is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = PickerConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
