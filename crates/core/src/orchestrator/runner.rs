//! Build orchestrator implementation.
//!
//! Drives one build through its phases:
//! - Cleaning: the output root is deleted and recreated
//! - Processing: categories run one at a time through the CategoryProcessor
//! - Writing: reports are merged into the manifest, which is written once

use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::Config;
use crate::discovery::{Discovery, PackageDiscovery};
use crate::metrics::{BUILD_RUNS, MANIFEST_ICONS};
use crate::processor::{BuildProgress, CategoryProcessor, CategoryReport, ProcessorConfig};
use crate::transformer::{EsbuildTransformer, Transformer};

use super::config::OrchestratorConfig;
use super::manifest::{Manifest, MANIFEST_FILE};
use super::types::{BuildError, BuildPhase, BuildSummary};

/// Runs full builds: clean, process every category, write the manifest.
pub struct BuildOrchestrator<D: Discovery, T: Transformer> {
    config: OrchestratorConfig,
    processor: CategoryProcessor<D, T>,
}

impl BuildOrchestrator<PackageDiscovery, EsbuildTransformer> {
    /// Wires the package discovery and the esbuild transformer from `config`.
    pub fn from_config(config: &Config) -> Self {
        let discovery = PackageDiscovery::new(
            &config.build.packages_dir,
            &config.build.file_prefix,
            &config.build.file_extension,
        );
        let transformer = EsbuildTransformer::new(config.transformer.clone());
        let processor =
            CategoryProcessor::new(ProcessorConfig::from(&config.build), discovery, transformer);

        Self::new(OrchestratorConfig::from(&config.build), processor)
    }
}

impl<D: Discovery, T: Transformer> BuildOrchestrator<D, T> {
    /// Creates a new orchestrator around a configured processor.
    pub fn new(config: OrchestratorConfig, processor: CategoryProcessor<D, T>) -> Self {
        Self { config, processor }
    }

    /// Publishes per-item progress of every category on `tx`.
    pub fn with_progress(mut self, tx: mpsc::Sender<BuildProgress>) -> Self {
        self.processor = self.processor.with_progress(tx);
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Returns the category processor.
    pub fn processor(&self) -> &CategoryProcessor<D, T> {
        &self.processor
    }

    /// Output root the build writes into.
    pub fn output_root(&self) -> &Path {
        &self.processor.config().output_root
    }

    /// Runs one build.
    ///
    /// Item and category problems are recorded in the summary. Only a failed
    /// pre-flight check, cleanup, or manifest write return an error.
    pub async fn run(&self) -> Result<BuildSummary, BuildError> {
        let result = self.run_phases().await;
        let label = if result.is_ok() { "success" } else { "failed" };
        BUILD_RUNS.with_label_values(&[label]).inc();
        result
    }

    async fn run_phases(&self) -> Result<BuildSummary, BuildError> {
        let start = Instant::now();
        let output_root = self.output_root();

        enter(BuildPhase::Init);
        let fixed_timestamp = self.fixed_timestamp()?;
        if self.config.validate_transformer {
            self.processor
                .transformer()
                .validate()
                .await
                .map_err(BuildError::TransformerUnavailable)?;
        }

        enter(BuildPhase::Cleaning);
        clean_output_root(output_root).await?;

        let total = self.config.categories.len();
        let mut reports: Vec<CategoryReport> = Vec::with_capacity(total);
        for (idx, category) in self.config.categories.iter().enumerate() {
            enter(BuildPhase::ProcessingCategory {
                index: idx + 1,
                total,
            });
            reports.push(self.processor.process(category).await);
        }

        enter(BuildPhase::WritingManifest);
        let generated_at = fixed_timestamp.unwrap_or_else(Utc::now);
        let manifest = Manifest::from_reports(generated_at, &reports);
        let manifest_path = output_root.join(MANIFEST_FILE);
        let manifest_sha256 = manifest.write_atomic(&manifest_path).await?;
        MANIFEST_ICONS.set(manifest.icon_count() as i64);

        enter(BuildPhase::Done);
        let total_succeeded: usize = reports.iter().map(CategoryReport::succeeded_count).sum();
        let total_failed: usize = reports.iter().map(|r| r.failed_count).sum();

        info!(
            manifest = %manifest_path.display(),
            sha256 = %manifest_sha256,
            failed = total_failed,
            "Done. {} icons built.",
            total_succeeded
        );

        Ok(BuildSummary {
            manifest_path,
            manifest,
            manifest_sha256,
            categories: reports,
            total_succeeded,
            total_failed,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn fixed_timestamp(&self) -> Result<Option<DateTime<Utc>>, BuildError> {
        self.config
            .source_date_epoch
            .map(|epoch| {
                DateTime::from_timestamp(epoch, 0).ok_or(BuildError::InvalidTimestamp(epoch))
            })
            .transpose()
    }
}

fn enter(phase: BuildPhase) {
    debug!(phase = %phase, "Build phase");
}

/// Deletes `root` recursively, tolerating its absence, then recreates it.
async fn clean_output_root(root: &Path) -> Result<(), BuildError> {
    let cleanup_error = |source| BuildError::Cleanup {
        path: root.to_path_buf(),
        source,
    };

    match tokio::fs::remove_dir_all(root).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(cleanup_error(e)),
    }

    tokio::fs::create_dir_all(root).await.map_err(cleanup_error)
}
