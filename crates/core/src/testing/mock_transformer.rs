//! Mock transformer for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::transformer::{TransformError, TransformJob, TransformResult, Transformer};

/// A recorded transformation for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedTransform {
    /// The job that was submitted.
    pub job: TransformJob,
    /// Whether the transformation succeeded.
    pub success: bool,
}

/// Mock implementation of the Transformer trait.
///
/// Provides controllable behavior for testing:
/// - Writes a small deterministic module to the output path on success
/// - Fails or panics for chosen source file names
/// - Simulates latency, globally or per file
/// - Tracks in-flight invocations and their peak
///
/// Clones share state, so a clone handed to a processor can be inspected
/// afterwards.
///
/// # Example
///
/// ```rust,ignore
/// use iconchunk_core::testing::MockTransformer;
///
/// let transformer = MockTransformer::new();
/// transformer.fail_on("faBroken.js").await;
/// transformer.set_latency(Duration::from_millis(5)).await;
///
/// // ... run a processor with transformer.clone() ...
///
/// assert_eq!(transformer.peak_in_flight(), 20);
/// ```
#[derive(Debug, Clone)]
pub struct MockTransformer {
    /// Recorded transformations.
    transforms: Arc<RwLock<Vec<RecordedTransform>>>,
    /// Source file names that fail.
    failing: Arc<RwLock<HashSet<String>>>,
    /// Source file names that panic.
    panicking: Arc<RwLock<HashSet<String>>>,
    /// Latency applied to every call.
    latency: Arc<RwLock<Duration>>,
    /// Latency overrides by source file name.
    file_latency: Arc<RwLock<HashMap<String, Duration>>>,
    /// Whether `validate` reports the bundler as missing.
    unavailable: Arc<RwLock<bool>>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl Default for MockTransformer {
    fn default() -> Self {
        Self::new()
    }
}

/// Decrements the in-flight counter even when the call panics.
struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockTransformer {
    /// Create a new mock transformer with no latency and no failures.
    pub fn new() -> Self {
        Self {
            transforms: Arc::new(RwLock::new(Vec::new())),
            failing: Arc::new(RwLock::new(HashSet::new())),
            panicking: Arc::new(RwLock::new(HashSet::new())),
            latency: Arc::new(RwLock::new(Duration::ZERO)),
            file_latency: Arc::new(RwLock::new(HashMap::new())),
            unavailable: Arc::new(RwLock::new(false)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get all recorded transformations.
    pub async fn recorded_transforms(&self) -> Vec<RecordedTransform> {
        self.transforms.read().await.clone()
    }

    /// Get the number of transformations attempted.
    pub async fn transform_count(&self) -> usize {
        self.transforms.read().await.len()
    }

    /// Clear recorded transformations and the in-flight peak.
    pub async fn clear_recorded(&self) {
        self.transforms.write().await.clear();
        self.peak_in_flight.store(0, Ordering::SeqCst);
    }

    /// Make transformations of `file_name` fail.
    pub async fn fail_on(&self, file_name: impl Into<String>) {
        self.failing.write().await.insert(file_name.into());
    }

    /// Make transformations of every name in `file_names` fail.
    pub async fn fail_on_all<I, S>(&self, file_names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut failing = self.failing.write().await;
        failing.extend(file_names.into_iter().map(Into::into));
    }

    /// Make transformations of `file_name` panic.
    pub async fn panic_on(&self, file_name: impl Into<String>) {
        self.panicking.write().await.insert(file_name.into());
    }

    /// Set the simulated latency for every call.
    pub async fn set_latency(&self, latency: Duration) {
        *self.latency.write().await = latency;
    }

    /// Set the simulated latency for one source file.
    pub async fn set_file_latency(&self, file_name: impl Into<String>, latency: Duration) {
        self.file_latency
            .write()
            .await
            .insert(file_name.into(), latency);
    }

    /// Make `validate` fail as if the bundler were missing.
    pub async fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write().await = unavailable;
    }

    /// Highest number of simultaneously running transformations seen.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Content written for a source file name.
    pub fn output_for(file_name: &str) -> String {
        format!("export default {:?};\n", file_name)
    }

    fn file_name(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    async fn latency_for(&self, file_name: &str) -> Duration {
        if let Some(latency) = self.file_latency.read().await.get(file_name) {
            return *latency;
        }
        *self.latency.read().await
    }

    async fn record(&self, job: TransformJob, success: bool) {
        self.transforms
            .write()
            .await
            .push(RecordedTransform { job, success });
    }
}

#[async_trait]
impl Transformer for MockTransformer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn transform(&self, job: TransformJob) -> Result<TransformResult, TransformError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlightGuard(Arc::clone(&self.in_flight));

        let file_name = Self::file_name(&job.source_path);

        let latency = self.latency_for(&file_name).await;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if self.panicking.read().await.contains(&file_name) {
            self.record(job, false).await;
            panic!("mock transformer panicked on {}", file_name);
        }

        if self.failing.read().await.contains(&file_name) {
            let source_path: PathBuf = job.source_path.clone();
            self.record(job, false).await;
            return Err(TransformError::failed(source_path, "mock failure", None));
        }

        let content = Self::output_for(&file_name);
        if let Err(e) = tokio::fs::write(&job.output_path, &content).await {
            let output_path = job.output_path.clone();
            self.record(job, false).await;
            return Err(TransformError::io(output_path, e));
        }

        let output_path = job.output_path.clone();
        self.record(job, true).await;

        Ok(TransformResult {
            output_path,
            output_size_bytes: content.len() as u64,
            duration_ms: latency.as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), TransformError> {
        if *self.unavailable.read().await {
            return Err(TransformError::BundlerNotFound {
                path: PathBuf::from("mock-bundler"),
            });
        }
        Ok(())
    }
}
