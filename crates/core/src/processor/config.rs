//! Configuration for the processor module.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::BuildConfig;

/// Configuration for category processing.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Output root; each category gets a sub-directory named after its short name.
    pub output_root: PathBuf,

    /// Maximum in-flight transformations within one category.
    pub concurrency: usize,

    /// Passed through to the transformer.
    pub minify: bool,

    /// Per-item timeout around each transformer call.
    pub item_timeout: Option<Duration>,

    /// Leading part stripped from file names to form icon ids.
    pub file_prefix: String,

    /// Trailing part stripped from file names to form icon ids.
    pub file_extension: String,
}

impl ProcessorConfig {
    /// Creates a config with the default naming convention (`fa*.js`).
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            concurrency: 20,
            minify: true,
            item_timeout: None,
            file_prefix: "fa".to_string(),
            file_extension: ".js".to_string(),
        }
    }

    /// Sets the concurrency limit.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Sets the minify flag.
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    /// Sets the per-item timeout.
    pub fn with_item_timeout(mut self, timeout: Duration) -> Self {
        self.item_timeout = Some(timeout);
        self
    }
}

impl From<&BuildConfig> for ProcessorConfig {
    fn from(build: &BuildConfig) -> Self {
        Self {
            output_root: build.output_dir.clone(),
            concurrency: build.concurrency,
            minify: build.minify,
            item_timeout: build.item_timeout(),
            file_prefix: build.file_prefix.clone(),
            file_extension: build.file_extension.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let config = ProcessorConfig::new("/out");
        assert_eq!(config.output_root, PathBuf::from("/out"));
        assert_eq!(config.concurrency, 20);
        assert!(config.minify);
        assert_eq!(config.item_timeout, None);
    }

    #[test]
    fn test_from_build_config() {
        let build = BuildConfig {
            concurrency: 8,
            minify: false,
            item_timeout_secs: Some(5),
            ..Default::default()
        };

        let config = ProcessorConfig::from(&build);
        assert_eq!(config.output_root, PathBuf::from("./dist"));
        assert_eq!(config.concurrency, 8);
        assert!(!config.minify);
        assert_eq!(config.item_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.file_prefix, "fa");
    }

    #[test]
    fn test_config_builder() {
        let config = ProcessorConfig::new("/out")
            .with_concurrency(2)
            .with_minify(false)
            .with_item_timeout(Duration::from_millis(250));

        assert_eq!(config.concurrency, 2);
        assert!(!config.minify);
        assert_eq!(config.item_timeout, Some(Duration::from_millis(250)));
    }
}
