//! Types for the processor module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::pool::FailureDetail;

/// One source-to-output transformation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Icon id, e.g. `SquareCheck` for `faSquareCheck.js`.
    pub id: String,
    /// Source module. Identity of the item.
    pub source_path: PathBuf,
    /// Destination inside the category's output sub-directory.
    pub output_path: PathBuf,
    /// Category identifier the item belongs to.
    pub category: String,
}

/// How a category's processing ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CategoryStatus {
    /// Items were discovered and run through the pool (possibly zero of them).
    Built,
    /// Discovery reported the category source as absent.
    SourceNotFound,
    /// The category could not be processed; nothing was transformed.
    Aborted { reason: String },
}

impl CategoryStatus {
    /// Label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Built => "built",
            Self::SourceNotFound => "not_found",
            Self::Aborted { .. } => "aborted",
        }
    }
}

/// A failed item, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFailure {
    pub id: String,
    pub source_path: PathBuf,
    pub detail: FailureDetail,
}

/// Result of processing one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryReport {
    /// Category identifier as requested.
    pub category: String,
    /// Derived short name; also the output sub-directory and manifest key.
    pub short_name: String,
    /// Ids of successfully transformed items, sorted ascending.
    pub succeeded_ids: Vec<String>,
    /// Number of items that failed.
    pub failed_count: usize,
    /// Per-item failure details, sorted by source path.
    pub failures: Vec<ItemFailure>,
    pub status: CategoryStatus,
}

impl CategoryReport {
    /// Report for a category whose source does not exist.
    pub fn not_found(category: impl Into<String>, short_name: impl Into<String>) -> Self {
        Self::empty(category, short_name, CategoryStatus::SourceNotFound)
    }

    /// Report for a category that could not be processed.
    pub fn aborted(
        category: impl Into<String>,
        short_name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::empty(
            category,
            short_name,
            CategoryStatus::Aborted {
                reason: reason.into(),
            },
        )
    }

    fn empty(
        category: impl Into<String>,
        short_name: impl Into<String>,
        status: CategoryStatus,
    ) -> Self {
        Self {
            category: category.into(),
            short_name: short_name.into(),
            succeeded_ids: Vec::new(),
            failed_count: 0,
            failures: Vec::new(),
            status,
        }
    }

    /// Number of successfully transformed items.
    pub fn succeeded_count(&self) -> usize {
        self.succeeded_ids.len()
    }

    /// Total items that went through the pool.
    pub fn total(&self) -> usize {
        self.succeeded_ids.len() + self.failed_count
    }
}

/// Progress events emitted while a build runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildProgress {
    /// A category was discovered and is about to be processed.
    CategoryStarted {
        category: String,
        short_name: String,
        total: usize,
    },
    /// One item finished, successfully or not.
    ItemCompleted {
        short_name: String,
        completed: usize,
        total: usize,
        succeeded: bool,
    },
    /// The category source was absent or unusable.
    CategorySkipped {
        category: String,
        short_name: String,
        reason: String,
    },
    /// A category finished processing.
    CategoryFinished {
        short_name: String,
        succeeded: usize,
        failed: usize,
    },
}
