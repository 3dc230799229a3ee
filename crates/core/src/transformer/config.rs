//! Configuration for the transformer module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the esbuild-based transformer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerConfig {
    /// Path to the bundler binary.
    #[serde(default = "default_bundler_path")]
    pub bundler_path: PathBuf,

    /// Timeout for a single bundler process in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Target platform passed to the bundler (browser, node, neutral).
    #[serde(default = "default_platform")]
    pub platform: String,

    /// Additional bundler arguments.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_bundler_path() -> PathBuf {
    PathBuf::from("esbuild")
}

fn default_timeout() -> u64 {
    60
}

fn default_platform() -> String {
    "neutral".to_string()
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            bundler_path: default_bundler_path(),
            timeout_secs: default_timeout(),
            platform: default_platform(),
            extra_args: Vec::new(),
        }
    }
}

impl TransformerConfig {
    /// Creates a new config with a custom bundler path.
    pub fn with_bundler(bundler_path: PathBuf) -> Self {
        Self {
            bundler_path,
            ..Default::default()
        }
    }

    /// Sets the timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Sets the target platform.
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }
}
