//! Per-category processing.

use std::path::Path;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::discovery::{Discovery, DiscoveryOutcome, SourceItem};
use crate::metrics::{CATEGORIES_TOTAL, CATEGORY_DURATION, ITEMS_PROCESSED};
use crate::naming;
use crate::pool::{ConcurrencyPool, ExecutionResult, Outcome, PoolProgress};
use crate::transformer::{TransformJob, Transformer};

use super::config::ProcessorConfig;
use super::types::{BuildProgress, CategoryReport, CategoryStatus, ItemFailure, WorkItem};

/// Processes one category end-to-end: discovery, transformation through the
/// pool, and aggregation into a [`CategoryReport`].
pub struct CategoryProcessor<D: Discovery, T: Transformer> {
    config: ProcessorConfig,
    discovery: D,
    transformer: T,
    progress_tx: Option<mpsc::Sender<BuildProgress>>,
}

impl<D: Discovery, T: Transformer> CategoryProcessor<D, T> {
    /// Creates a new processor.
    pub fn new(config: ProcessorConfig, discovery: D, transformer: T) -> Self {
        Self {
            config,
            discovery,
            transformer,
            progress_tx: None,
        }
    }

    /// Publishes progress events on `tx`.
    ///
    /// Events are sent with `try_send`; a full channel drops the update.
    pub fn with_progress(mut self, tx: mpsc::Sender<BuildProgress>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Returns the transformer.
    pub fn transformer(&self) -> &T {
        &self.transformer
    }

    /// Processes `category` and returns its report.
    ///
    /// Never fails: a missing source, a discovery error, or an unusable
    /// output directory produce an empty report, and item failures are
    /// counted rather than propagated.
    pub async fn process(&self, category: &str) -> CategoryReport {
        let start = Instant::now();
        let short_name = naming::short_name(category);

        let report = self.process_inner(category, &short_name).await;

        CATEGORY_DURATION
            .with_label_values(&[short_name.as_str()])
            .observe(start.elapsed().as_secs_f64());
        CATEGORIES_TOTAL
            .with_label_values(&[report.status.label()])
            .inc();

        report
    }

    async fn process_inner(&self, category: &str, short_name: &str) -> CategoryReport {
        let sources = match self.discovery.discover(category).await {
            Ok(DiscoveryOutcome::Found(items)) => items,
            Ok(DiscoveryOutcome::NotFound { path }) => {
                warn!(
                    style = %category,
                    path = %path.display(),
                    "Style not found, skipping"
                );
                self.emit(BuildProgress::CategorySkipped {
                    category: category.to_string(),
                    short_name: short_name.to_string(),
                    reason: format!("{} not found", path.display()),
                });
                return CategoryReport::not_found(category, short_name);
            }
            Err(e) => {
                warn!(style = %category, error = %e, "Discovery failed, skipping style");
                self.emit(BuildProgress::CategorySkipped {
                    category: category.to_string(),
                    short_name: short_name.to_string(),
                    reason: e.to_string(),
                });
                return CategoryReport::aborted(category, short_name, e.to_string());
            }
        };

        let output_dir = self.config.output_root.join(short_name);
        if let Err(e) = tokio::fs::create_dir_all(&output_dir).await {
            warn!(
                style = %short_name,
                dir = %output_dir.display(),
                error = %e,
                "Failed to create output directory, skipping style"
            );
            let reason = format!("failed to create {}: {}", output_dir.display(), e);
            self.emit(BuildProgress::CategorySkipped {
                category: category.to_string(),
                short_name: short_name.to_string(),
                reason: reason.clone(),
            });
            return CategoryReport::aborted(category, short_name, reason);
        }

        let items: Vec<WorkItem> = sources
            .into_iter()
            .map(|source| self.work_item(category, &output_dir, source))
            .collect();
        let total = items.len();

        info!(style = %short_name, total, "Processing style");
        self.emit(BuildProgress::CategoryStarted {
            category: category.to_string(),
            short_name: short_name.to_string(),
            total,
        });

        let pool = ConcurrencyPool::new(self.config.concurrency)
            .with_optional_timeout(self.config.item_timeout);
        let minify = self.config.minify;

        let results = pool
            .run_with_progress(
                items,
                |item: WorkItem| async move {
                    let job = TransformJob {
                        source_path: item.source_path,
                        output_path: item.output_path,
                        minify,
                    };
                    self.transformer.transform(job).await.map(|_| ())
                },
                |result: &ExecutionResult<WorkItem>, progress: PoolProgress| {
                    self.emit(BuildProgress::ItemCompleted {
                        short_name: short_name.to_string(),
                        completed: progress.completed,
                        total: progress.total,
                        succeeded: result.is_success(),
                    });
                },
            )
            .await;

        let report = aggregate(category, short_name, results);

        info!(
            style = %short_name,
            succeeded = report.succeeded_count(),
            failed = report.failed_count,
            "Style complete"
        );
        self.emit(BuildProgress::CategoryFinished {
            short_name: short_name.to_string(),
            succeeded: report.succeeded_count(),
            failed: report.failed_count,
        });

        report
    }

    fn work_item(&self, category: &str, output_dir: &Path, source: SourceItem) -> WorkItem {
        WorkItem {
            id: naming::icon_id(
                &source.file_name,
                &self.config.file_prefix,
                &self.config.file_extension,
            ),
            output_path: output_dir.join(&source.file_name),
            source_path: source.path,
            category: category.to_string(),
        }
    }

    fn emit(&self, event: BuildProgress) {
        if let Some(tx) = &self.progress_tx {
            if tx.try_send(event).is_err() {
                debug!("Progress channel full or closed, dropping update");
            }
        }
    }
}

/// Folds pool results into a report with sorted ids and sorted failures.
fn aggregate(
    category: &str,
    short_name: &str,
    results: Vec<ExecutionResult<WorkItem>>,
) -> CategoryReport {
    let mut succeeded_ids = Vec::with_capacity(results.len());
    let mut failures = Vec::new();

    for result in results {
        match result.outcome {
            Outcome::Success => {
                ITEMS_PROCESSED
                    .with_label_values(&[short_name, "success"])
                    .inc();
                succeeded_ids.push(result.item.id);
            }
            Outcome::Failure(detail) => {
                ITEMS_PROCESSED
                    .with_label_values(&[short_name, detail.kind()])
                    .inc();
                warn!(
                    style = %short_name,
                    source = %result.item.source_path.display(),
                    error = %detail,
                    "Failed to build icon"
                );
                failures.push(ItemFailure {
                    id: result.item.id,
                    source_path: result.item.source_path,
                    detail,
                });
            }
        }
    }

    succeeded_ids.sort();
    failures.sort_by(|a, b| a.source_path.cmp(&b.source_path));

    CategoryReport {
        category: category.to_string(),
        short_name: short_name.to_string(),
        succeeded_ids,
        failed_count: failures.len(),
        failures,
        status: CategoryStatus::Built,
    }
}
