//! Trait definitions for the discovery module.

use async_trait::async_trait;

use super::error::DiscoveryError;
use super::types::DiscoveryOutcome;

/// Lists candidate source modules for a category.
#[async_trait]
pub trait Discovery: Send + Sync {
    /// Returns the name of this discovery implementation.
    fn name(&self) -> &str;

    /// Discovers the source modules of `category`.
    ///
    /// A missing category is `Ok(DiscoveryOutcome::NotFound { .. })`.
    async fn discover(&self, category: &str) -> Result<DiscoveryOutcome, DiscoveryError>;
}
