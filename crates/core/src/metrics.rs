//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Catalog mutations (add/remove outcomes)
//! - Snapshot loading and persistence

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Catalog Mutation Metrics
// =============================================================================

/// Catalog mutations by operation and result.
pub static CATALOG_MUTATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "shelfkeeper_catalog_mutations_total",
            "Total catalog mutation attempts",
        ),
        // operation: "add", "remove"
        // result: "ok", "noop", "validation", "duplicate", "persistence", "not_ready"
        &["operation", "result"],
    )
    .unwrap()
});

// =============================================================================
// Snapshot Metrics
// =============================================================================

/// Snapshot loads by outcome.
pub static SNAPSHOT_LOADS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("shelfkeeper_snapshot_loads_total", "Total snapshot loads"),
        &["outcome"], // "fresh", "restored", "recovered"
    )
    .unwrap()
});

/// Snapshot commit duration in seconds.
pub static PERSIST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "shelfkeeper_snapshot_persist_duration_seconds",
            "Duration of snapshot commits",
        )
        .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 1.0]),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// Get all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CATALOG_MUTATIONS.clone()),
        Box::new(SNAPSHOT_LOADS.clone()),
        Box::new(PERSIST_DURATION.clone()),
    ]
}
