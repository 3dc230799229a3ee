//! Mock discovery for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::discovery::{Discovery, DiscoveryError, DiscoveryOutcome, SourceItem};

#[derive(Debug, Clone)]
enum CategoryEntry {
    Items(Vec<SourceItem>),
    Error(String),
}

/// Mock implementation of the Discovery trait.
///
/// Categories must be registered; unknown categories are reported as not
/// found. Items are virtual: nothing needs to exist on disk.
///
/// # Example
///
/// ```rust,ignore
/// use iconchunk_core::testing::MockDiscovery;
///
/// let discovery = MockDiscovery::new();
/// discovery.set_files("pro-regular-svg-icons", ["faHouse.js", "faUser.js"]).await;
/// discovery.set_error("pro-light-svg-icons", "permission denied").await;
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockDiscovery {
    categories: Arc<RwLock<HashMap<String, CategoryEntry>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockDiscovery {
    /// Create a new mock with no registered categories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a category with explicit items.
    pub async fn set_items(&self, category: impl Into<String>, items: Vec<SourceItem>) {
        self.categories
            .write()
            .await
            .insert(category.into(), CategoryEntry::Items(items));
    }

    /// Register a category whose items are `file_names` under a virtual
    /// directory named after the category.
    pub async fn set_files<I, S>(&self, category: &str, file_names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dir = Self::virtual_dir(category);
        let items = file_names
            .into_iter()
            .map(|name| SourceItem::from_path(dir.join(name.as_ref())))
            .collect();
        self.set_items(category, items).await;
    }

    /// Make discovery of `category` fail with an I/O error.
    pub async fn set_error(&self, category: impl Into<String>, message: impl Into<String>) {
        self.categories
            .write()
            .await
            .insert(category.into(), CategoryEntry::Error(message.into()));
    }

    /// Categories requested so far, in call order.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    /// Directory used for items registered with [`set_files`](Self::set_files).
    pub fn virtual_dir(category: &str) -> PathBuf {
        Path::new("/virtual").join(category)
    }
}

#[async_trait]
impl Discovery for MockDiscovery {
    fn name(&self) -> &str {
        "mock"
    }

    async fn discover(&self, category: &str) -> Result<DiscoveryOutcome, DiscoveryError> {
        self.calls.write().await.push(category.to_string());

        match self.categories.read().await.get(category) {
            Some(CategoryEntry::Items(items)) => Ok(DiscoveryOutcome::Found(items.clone())),
            Some(CategoryEntry::Error(message)) => Err(DiscoveryError::ReadFailed {
                path: Self::virtual_dir(category),
                source: std::io::Error::other(message.clone()),
            }),
            None => Ok(DiscoveryOutcome::NotFound {
                path: Self::virtual_dir(category),
            }),
        }
    }
}
