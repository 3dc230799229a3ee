//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the collaborator traits,
//! allowing the processor and orchestrator to be tested without a bundler
//! or an installed icon package.
//!
//! # Example
//!
//! ```rust,ignore
//! use iconchunk_core::testing::{fixtures, MockDiscovery, MockTransformer};
//!
//! let discovery = MockDiscovery::new();
//! discovery
//!     .set_files("pro-regular-svg-icons", fixtures::icon_file_names(1500))
//!     .await;
//!
//! let transformer = MockTransformer::new();
//! transformer.fail_on("faIcon0007.js").await;
//! ```

mod mock_discovery;
mod mock_transformer;

pub use mock_discovery::MockDiscovery;
pub use mock_transformer::{MockTransformer, RecordedTransform};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::{Path, PathBuf};

    /// `count` distinct icon file names, `faIcon0000.js` upwards.
    pub fn icon_file_names(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("faIcon{:04}.js", i)).collect()
    }

    /// The icon id the default naming convention derives from `file_name`.
    pub fn icon_id(file_name: &str) -> String {
        crate::naming::icon_id(file_name, "fa", ".js")
    }

    /// Writes a fake icon package at `<packages_dir>/<category>/` containing
    /// one CommonJS module per file name. Returns the package directory.
    pub fn write_package<S: AsRef<str>>(
        packages_dir: &Path,
        category: &str,
        file_names: &[S],
    ) -> std::io::Result<PathBuf> {
        let dir = packages_dir.join(category);
        std::fs::create_dir_all(&dir)?;
        for name in file_names {
            let name = name.as_ref();
            std::fs::write(
                dir.join(name),
                format!("exports.definition = {{ iconName: {:?} }};\n", name),
            )?;
        }
        Ok(dir)
    }
}
