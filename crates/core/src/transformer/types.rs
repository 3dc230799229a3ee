//! Types for the transformer module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single source-to-output transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformJob {
    /// Source module to read.
    pub source_path: PathBuf,
    /// Destination file. Its parent directory already exists.
    pub output_path: PathBuf,
    /// Whether to minify the output.
    pub minify: bool,
}

/// Result of a successful transformation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformResult {
    /// Path of the written file.
    pub output_path: PathBuf,
    /// Size of the written file in bytes.
    pub output_size_bytes: u64,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}
