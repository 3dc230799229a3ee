//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Category processing (items by result, category duration)
//! - Builds (runs by result, icons in the last manifest)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Category Processing Metrics
// =============================================================================

/// Items processed total by style and result.
pub static ITEMS_PROCESSED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("iconchunk_items_processed_total", "Total icon modules processed"),
        &["style", "result"], // result: "success", "failed", "timeout", "panicked"
    )
    .unwrap()
});

/// Category processing duration in seconds.
pub static CATEGORY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "iconchunk_category_duration_seconds",
            "Duration of one category's processing",
        )
        .buckets(vec![0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
        &["style"],
    )
    .unwrap()
});

/// Categories processed total by status.
pub static CATEGORIES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("iconchunk_categories_total", "Total categories processed"),
        &["status"], // "built", "not_found", "aborted"
    )
    .unwrap()
});

// =============================================================================
// Build Metrics
// =============================================================================

/// Build runs total by result.
pub static BUILD_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("iconchunk_build_runs_total", "Total build runs"),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// Icons listed in the most recently written manifest.
pub static MANIFEST_ICONS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "iconchunk_manifest_icons",
        "Number of icons in the last written manifest",
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Category processing
        Box::new(ITEMS_PROCESSED.clone()),
        Box::new(CATEGORY_DURATION.clone()),
        Box::new(CATEGORIES_TOTAL.clone()),
        // Builds
        Box::new(BUILD_RUNS.clone()),
        Box::new(MANIFEST_ICONS.clone()),
    ]
}
