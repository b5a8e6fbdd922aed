//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the shelfkeeper server:
//! - HTTP request metrics (latency, counts)
//! - WebSocket connection metrics
//! - Catalog size (collected at scrape time)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};
use regex_lite::Regex;
use tracing::error;

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
            "shelfkeeper_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("shelfkeeper_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "shelfkeeper_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// WebSocket Metrics
// =============================================================================

/// Active WebSocket connections.
pub static WS_CONNECTIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "shelfkeeper_ws_connections_active",
        "Number of active WebSocket connections",
    )
    .unwrap()
});

/// Total WebSocket connections since start.
pub static WS_CONNECTIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "shelfkeeper_ws_connections_total",
        "Total WebSocket connections accepted",
    )
    .unwrap()
});

/// WebSocket messages sent by event type.
pub static WS_MESSAGES_SENT: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "shelfkeeper_ws_messages_sent_total",
            "Total WebSocket messages sent",
        ),
        &["type"],
    )
    .unwrap()
});

/// Times a WebSocket client fell behind the event channel.
pub static WS_LAG_EVENTS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "shelfkeeper_ws_lag_events_total",
        "Total WebSocket lag events (client too slow)",
    )
    .unwrap()
});

// =============================================================================
// Catalog Metrics
// =============================================================================

/// Products currently in the catalog.
pub static CATALOG_PRODUCTS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "shelfkeeper_catalog_products",
        "Number of products in the catalog",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // WebSocket
    registry
        .register(Box::new(WS_CONNECTIONS_ACTIVE.clone()))
        .unwrap();
    registry
        .register(Box::new(WS_CONNECTIONS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(WS_MESSAGES_SENT.clone()))
        .unwrap();
    registry.register(Box::new(WS_LAG_EVENTS.clone())).unwrap();

    // Catalog
    registry
        .register(Box::new(CATALOG_PRODUCTS.clone()))
        .unwrap();

    // Core metrics (mutations, snapshot loads and commits)
    for metric in shelfkeeper_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Collect dynamic metrics from current application state.
///
/// This is called before encoding metrics to update gauges with current values.
pub async fn collect_dynamic_metrics(state: &crate::state::AppState) {
    if let Ok(count) = state.catalog().len().await {
        CATALOG_PRODUCTS.set(count as i64);
    }
}

static PRODUCT_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*/products)/[^/]+$").unwrap());

/// Normalize a path for metric labels (replace product names with a placeholder).
pub fn normalize_path(path: &str) -> String {
    PRODUCT_PATH.replace(path, "$1/{name}").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_product_name() {
        assert_eq!(
            normalize_path("/api/v1/products/Bluetooth%20Headset"),
            "/api/v1/products/{name}"
        );
    }

    #[test]
    fn test_normalize_path_collection_untouched() {
        assert_eq!(normalize_path("/api/v1/products"), "/api/v1/products");
    }

    #[test]
    fn test_normalize_path_no_ids() {
        assert_eq!(normalize_path("/api/v1/health"), "/api/v1/health");
    }

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/test", "200"])
            .inc();

        let output = encode_metrics();
        assert!(output.contains("shelfkeeper_http_requests_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_registry_contains_core_metrics() {
        shelfkeeper_core::metrics::CATALOG_MUTATIONS
            .with_label_values(&["add", "ok"])
            .inc();
        CATALOG_PRODUCTS.set(0);
        WS_CONNECTIONS_ACTIVE.set(0);

        let output = encode_metrics();
        assert!(output.contains("shelfkeeper_catalog_mutations_total"));
        assert!(output.contains("shelfkeeper_catalog_products"));
        assert!(output.contains("shelfkeeper_ws_connections_active"));
    }
}
