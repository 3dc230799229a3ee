//! Error types for the transformer module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while transforming a source module.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Bundler binary not found.
    #[error("Bundler not found at path: {path}")]
    BundlerNotFound { path: PathBuf },

    /// Source module not found.
    #[error("Source module not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// The bundler ran but did not produce a valid module.
    #[error("Transform failed for {source_path}: {reason}")]
    Failed {
        source_path: PathBuf,
        reason: String,
        stderr: Option<String>,
    },

    /// The bundler did not finish in time.
    #[error("Transform of {source_path} timed out after {timeout_secs} seconds")]
    Timeout {
        source_path: PathBuf,
        timeout_secs: u64,
    },

    /// I/O error while preparing or persisting the output.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TransformError {
    /// Creates a transform failed error with optional stderr output.
    pub fn failed(
        source_path: impl Into<PathBuf>,
        reason: impl Into<String>,
        stderr: Option<String>,
    ) -> Self {
        Self::Failed {
            source_path: source_path.into(),
            reason: reason.into(),
            stderr,
        }
    }

    /// Creates an I/O error tied to a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_source_path() {
        let err = TransformError::failed("/src/faHouse.js", "syntax error", None);
        assert_eq!(
            err.to_string(),
            "Transform failed for /src/faHouse.js: syntax error"
        );

        let err = TransformError::Timeout {
            source_path: PathBuf::from("/src/faHouse.js"),
            timeout_secs: 5,
        };
        assert!(err.to_string().contains("/src/faHouse.js"));
    }
}
