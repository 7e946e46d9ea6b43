//! Picker errors
//!
//! Interaction paths never fail; these errors only come from loading
//! configuration, locale bundles and tree data.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PickerError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PickerError>;

pub(crate) fn read_to_string(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| PickerError::Io {
        path: path.to_path_buf(),
        source,
    })
}
