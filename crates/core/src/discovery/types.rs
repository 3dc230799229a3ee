//! Types for the discovery module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A candidate source module.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceItem {
    /// Absolute or root-relative path of the module.
    pub path: PathBuf,
    /// File name of the module, e.g. `faHouse.js`.
    pub file_name: String,
}

impl SourceItem {
    /// Builds an item from a path, using its final component as file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { path, file_name }
    }
}

/// Result of looking up a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    /// The category exists; the list may be empty.
    Found(Vec<SourceItem>),
    /// The category source does not exist.
    NotFound { path: PathBuf },
}
