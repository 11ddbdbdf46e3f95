//! Observability for the query path
//!
//! Prometheus metrics registered once in the process-wide registry, exposed
//! through a cloneable handle.

use prometheus::{
    register_histogram, register_int_counter_vec, register_int_gauge, Histogram, IntCounterVec,
    IntGauge,
};
use std::sync::OnceLock;

use crate::error::StoreError;
use crate::models::MetricValue;

/// Histogram buckets for query latency (in seconds); the path is in-memory
/// only, so the buckets sit well below a millisecond
const LATENCY_BUCKETS: &[f64] = &[
    0.000_001, 0.000_005, 0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<StoreMetricsInner> = OnceLock::new();

/// Inner structure holding the actual Prometheus metrics
struct StoreMetricsInner {
    queries_total: IntCounterVec,
    query_latency_seconds: Histogram,
    profiles_cached: IntGauge,
}

impl StoreMetricsInner {
    fn new() -> Self {
        Self {
            queries_total: register_int_counter_vec!(
                "profile_metric_store_queries_total",
                "Metric queries served, labelled by outcome",
                &["outcome"]
            )
            .expect("Failed to register queries_total"),

            query_latency_seconds: register_histogram!(
                "profile_metric_store_query_latency_seconds",
                "Time spent resolving a metric query",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register query_latency_seconds"),

            profiles_cached: register_int_gauge!(
                "profile_metric_store_profiles_cached",
                "Number of workload profiles currently cached"
            )
            .expect("Failed to register profiles_cached"),
        }
    }
}

/// Store metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance. Multiple
/// clones share the same underlying metrics.
#[derive(Clone)]
pub struct StoreMetrics {
    _private: (),
}

impl Default for StoreMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(StoreMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &StoreMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record one query with its latency and outcome
    pub fn observe_query(&self, duration_secs: f64, result: &Result<MetricValue, StoreError>) {
        let outcome = match result {
            Ok(_) => "ok",
            Err(StoreError::InvalidQuery(_)) => "invalid_query",
            Err(StoreError::NotFound(_)) => "not_found",
            Err(StoreError::Lookup(_)) => "lookup_error",
        };
        self.inner().queries_total.with_label_values(&[outcome]).inc();
        self.inner().query_latency_seconds.observe(duration_secs);
    }

    /// Update the cached-profile gauge
    pub fn set_profiles_cached(&self, count: i64) {
        self.inner().profiles_cached.set(count);
    }
}
