use std::path::{Path, PathBuf};

use iconchunk_core::Config;

/// Shared application state
pub struct AppState {
    config: Config,
    icons_root: PathBuf,
}

impl AppState {
    /// Serves icons from the configured build output directory.
    pub fn new(config: Config) -> Self {
        let icons_root = config.build.output_dir.clone();
        Self { config, icons_root }
    }

    /// Serves icons from `icons_root` instead of the configured output directory.
    pub fn with_icons_root(mut self, icons_root: impl Into<PathBuf>) -> Self {
        self.icons_root = icons_root.into();
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn icons_root(&self) -> &Path {
        &self.icons_root
    }
}
