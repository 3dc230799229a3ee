//! Error types for the discovery module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while listing a category.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The category path exists but is not a directory.
    #[error("Category source is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Failed to read the category directory.
    #[error("Failed to read category source {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
