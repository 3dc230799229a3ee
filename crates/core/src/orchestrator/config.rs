//! Orchestrator configuration.

use serde::{Deserialize, Serialize};

use crate::config::BuildConfig;

/// Configuration for a build run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Category identifiers, processed in this order, one at a time.
    pub categories: Vec<String>,

    /// Fixed UNIX timestamp for the manifest's `generatedAt`.
    /// When unset the wall clock at manifest time is used.
    #[serde(default)]
    pub source_date_epoch: Option<i64>,

    /// Check that the transformer is usable before the output root is touched.
    #[serde(default = "default_validate_transformer")]
    pub validate_transformer: bool,
}

fn default_validate_transformer() -> bool {
    true
}

impl OrchestratorConfig {
    /// Creates a config for the given categories.
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            source_date_epoch: None,
            validate_transformer: default_validate_transformer(),
        }
    }

    /// Pins `generatedAt` to a fixed timestamp.
    pub fn with_source_date_epoch(mut self, epoch: i64) -> Self {
        self.source_date_epoch = Some(epoch);
        self
    }

    /// Enables or disables the transformer pre-flight check.
    pub fn with_transformer_validation(mut self, enabled: bool) -> Self {
        self.validate_transformer = enabled;
        self
    }
}

impl From<&BuildConfig> for OrchestratorConfig {
    fn from(build: &BuildConfig) -> Self {
        Self {
            categories: build.styles.clone(),
            source_date_epoch: build.source_date_epoch,
            validate_transformer: default_validate_transformer(),
        }
    }
}
