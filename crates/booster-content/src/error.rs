//! Content loading errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or parsing a catalog.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The catalog file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The catalog is not valid JSON for its schema.
    #[error("invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    /// The catalog is not valid YAML for its schema.
    #[error("invalid YAML catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An item names a category that does not exist.
    #[error("item {name:?} has unknown item type {item_type:?}")]
    UnknownItemType {
        /// Item name.
        name: String,
        /// The unrecognized category.
        item_type: String,
    },

    /// The file extension maps to no supported format.
    #[error("unsupported catalog format: {0}")]
    UnsupportedFormat(PathBuf),
}
