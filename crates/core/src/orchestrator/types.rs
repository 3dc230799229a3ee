//! Types for the build orchestrator.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use super::manifest::Manifest;
use crate::processor::CategoryReport;
use crate::transformer::TransformError;

/// Fatal errors that abort a build.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The transformer failed its pre-flight check.
    #[error("transformer unavailable: {0}")]
    TransformerUnavailable(#[source] TransformError),

    /// `source_date_epoch` is outside the representable range.
    #[error("invalid source date epoch: {0}")]
    InvalidTimestamp(i64),

    /// The output root could not be deleted or recreated.
    #[error("failed to clean output directory {path}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest could not be serialized.
    #[error("failed to serialize manifest: {0}")]
    ManifestSerialize(#[from] serde_json::Error),

    /// The manifest could not be written.
    #[error("failed to write manifest {path}: {source}")]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Phases of a build run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    Init,
    Cleaning,
    ProcessingCategory { index: usize, total: usize },
    WritingManifest,
    Done,
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::Cleaning => write!(f, "cleaning"),
            Self::ProcessingCategory { index, total } => {
                write!(f, "processing category {}/{}", index, total)
            }
            Self::WritingManifest => write!(f, "writing manifest"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Outcome of a completed build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
    /// Where the manifest was written.
    pub manifest_path: PathBuf,
    pub manifest: Manifest,
    /// Hex SHA-256 of the manifest file contents.
    pub manifest_sha256: String,
    /// One report per requested category, in request order.
    pub categories: Vec<CategoryReport>,
    pub total_succeeded: usize,
    pub total_failed: usize,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(BuildPhase::Cleaning.to_string(), "cleaning");
        assert_eq!(
            BuildPhase::ProcessingCategory { index: 2, total: 3 }.to_string(),
            "processing category 2/3"
        );
    }

    #[test]
    fn test_cleanup_error_message() {
        let err = BuildError::Cleanup {
            path: PathBuf::from("/dist"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            err.to_string(),
            "failed to clean output directory /dist: denied"
        );
    }
}
