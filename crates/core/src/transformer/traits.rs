//! Trait definitions for the transformer module.

use async_trait::async_trait;

use super::error::TransformError;
use super::types::{TransformJob, TransformResult};

/// Converts one source module into one output module.
///
/// Implementations must either write a complete file at
/// `job.output_path` or leave nothing there.
#[async_trait]
pub trait Transformer: Send + Sync {
    /// Returns the name of this transformer implementation.
    fn name(&self) -> &str;

    /// Transforms a single source module.
    async fn transform(&self, job: TransformJob) -> Result<TransformResult, TransformError>;

    /// Validates that the transformer is properly configured and ready.
    async fn validate(&self) -> Result<(), TransformError>;
}
