//! Package-directory discovery.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use super::error::DiscoveryError;
use super::traits::Discovery;
use super::types::{DiscoveryOutcome, SourceItem};
use crate::naming;

/// Discovers icon modules inside `<packages_dir>/<category>/`.
///
/// Only regular files directly inside the category directory whose name is
/// `<prefix><stem><extension>` are returned, sorted by file name.
pub struct PackageDiscovery {
    packages_dir: PathBuf,
    file_prefix: String,
    file_extension: String,
}

impl PackageDiscovery {
    /// Creates a discovery rooted at `packages_dir` using the given naming
    /// convention.
    pub fn new(
        packages_dir: impl Into<PathBuf>,
        file_prefix: impl Into<String>,
        file_extension: impl Into<String>,
    ) -> Self {
        Self {
            packages_dir: packages_dir.into(),
            file_prefix: file_prefix.into(),
            file_extension: file_extension.into(),
        }
    }

    /// Directory that holds the given category.
    pub fn category_dir(&self, category: &str) -> PathBuf {
        self.packages_dir.join(category)
    }
}

#[async_trait]
impl Discovery for PackageDiscovery {
    fn name(&self) -> &str {
        "package"
    }

    async fn discover(&self, category: &str) -> Result<DiscoveryOutcome, DiscoveryError> {
        let dir = self.category_dir(category);

        let metadata = match tokio::fs::metadata(&dir).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(DiscoveryOutcome::NotFound { path: dir });
            }
            Err(e) => return Err(DiscoveryError::ReadFailed { path: dir, source: e }),
        };
        if !metadata.is_dir() {
            return Err(DiscoveryError::NotADirectory { path: dir });
        }

        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| DiscoveryError::ReadFailed {
                path: dir.clone(),
                source: e,
            })?;

        let mut items = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DiscoveryError::ReadFailed {
                path: dir.clone(),
                source: e,
            })?
        {
            let file_name = entry.file_name().to_string_lossy().to_string();
            if !naming::matches_convention(&file_name, &self.file_prefix, &self.file_extension) {
                continue;
            }

            // Follows symlinks, as package managers often link files.
            let is_file = tokio::fs::metadata(entry.path())
                .await
                .map(|m| m.is_file())
                .unwrap_or(false);
            if is_file {
                items.push(SourceItem {
                    path: entry.path(),
                    file_name,
                });
            }
        }

        items.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        debug!(
            category = %category,
            dir = %dir.display(),
            count = items.len(),
            "Discovered source modules"
        );

        Ok(DiscoveryOutcome::Found(items))
    }
}
