//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the iconchunk server:
//! - HTTP request metrics (latency, counts, in flight)
//! - Icon route outcomes and bytes served
//! - Core build metrics, registered into the same registry

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};
use regex_lite::Regex;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "iconchunk_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("iconchunk_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "iconchunk_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Icon Route Metrics
// =============================================================================

/// Icon requests by outcome.
pub static ICON_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("iconchunk_icon_requests_total", "Icon module requests"),
        &["outcome"], // "served", "not_found", "rejected"
    )
    .unwrap()
});

/// Bytes of icon modules served.
pub static ICON_BYTES_SERVED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "iconchunk_icon_bytes_served_total",
        "Total bytes of icon modules served",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // HTTP
        Box::new(HTTP_REQUEST_DURATION.clone()),
        Box::new(HTTP_REQUESTS_TOTAL.clone()),
        Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()),
        // Icons
        Box::new(ICON_REQUESTS_TOTAL.clone()),
        Box::new(ICON_BYTES_SERVED.clone()),
    ];

    // Core metrics (category processing, builds)
    for metric in collectors
        .into_iter()
        .chain(iconchunk_core::metrics::all_metrics())
    {
        if let Err(e) = registry.register(metric) {
            tracing::warn!(error = %e, "Failed to register metric");
        }
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

static ICON_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/icons/.*$").unwrap());

/// Normalize a path for metric labels.
///
/// Every icon request collapses into `/icons/{path}` so label cardinality
/// stays bounded.
pub fn normalize_path(path: &str) -> String {
    ICON_PATH.replace(path, "/icons/{path}").to_string()
}
