//! Message bundle for user-facing strings
//!
//! Messages are looked up by id. Unknown ids render as the id itself, so a
//! missing translation degrades to a readable key instead of an empty toggle.

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{read_to_string, Result};

/// Built-in English messages
const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    ("placeholder", "Select"),
    ("searchPlaceholder", "Search"),
    ("checkAll", "All"),
    ("noResultsText", "No results found"),
];

/// A set of localized messages keyed by id
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale {
    messages: FxHashMap<String, String>,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            messages: DEFAULT_MESSAGES
                .iter()
                .map(|(id, text)| (id.to_string(), text.to_string()))
                .collect(),
        }
    }
}

impl Locale {
    /// An empty bundle (every lookup falls back to the id)
    pub fn empty() -> Self {
        Self {
            messages: FxHashMap::default(),
        }
    }

    /// Add or replace a message
    pub fn with_message(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.messages.insert(id.into(), text.into());
        self
    }

    pub fn message(&self, id: &str) -> Option<&str> {
        self.messages.get(id).map(String::as_str)
    }

    /// Resolve `id`, falling back to the id itself
    pub fn format(&self, id: &str) -> String {
        match self.message(id) {
            Some(text) => text.to_string(),
            None => {
                tracing::trace!(id, "missing locale message");
                id.to_string()
            }
        }
    }

    /// Parse a flat TOML table of `id = "text"` layered over the defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let overrides: FxHashMap<String, String> = toml::from_str(source)?;
        let mut locale = Self::default();
        locale.messages.extend(overrides);
        Ok(locale)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&read_to_string(path.as_ref())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let locale = Locale::default();
        assert_eq!(locale.format("placeholder"), "Select");
        assert_eq!(locale.format("searchPlaceholder"), "Search");
    }

    #[test]
    fn test_unknown_id_falls_back_to_id() {
        assert_eq!(Locale::empty().format("placeholder"), "placeholder");
        assert_eq!(Locale::default().message("missing"), None);
    }

    #[test]
    fn test_toml_overrides_layer_over_defaults() {
        let locale = Locale::from_toml_str(
            r#"
            placeholder = "Choisir"
            pickFruit = "Choisir un fruit"
            "#,
        )
        .unwrap();

        assert_eq!(locale.format("placeholder"), "Choisir");
        assert_eq!(locale.format("pickFruit"), "Choisir un fruit");
        assert_eq!(locale.format("checkAll"), "All");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(Locale::from_toml_str("placeholder = ").is_err());
    }
}
