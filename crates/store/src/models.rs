//! Core data models for workload profiles and their aggregated metric history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed-point quantity stored in milli-units.
///
/// A raw value of 2500 stands for 2.5 of the underlying resource.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(i64);

impl Quantity {
    pub fn from_millis(millis: i64) -> Self {
        Quantity(millis)
    }

    pub fn millis(&self) -> i64 {
        self.0
    }

    /// Decimal scalar value, milli-units divided by 1000
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 1000.0
    }
}

/// Resource usage of one named container inside a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerUsage {
    pub name: String,
    /// Usage keyed by resource name (e.g. "cpu"), in milli-units
    pub usage: BTreeMap<String, Quantity>,
}

/// One timestamped aggregate measurement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub timestamp: DateTime<Utc>,
    pub containers: Vec<ContainerUsage>,
}

/// Snapshot history written by a single producer, tagged with its scope.
///
/// Producers append items in non-decreasing timestamp order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedMetrics {
    pub scope: String,
    pub items: Vec<MetricSnapshot>,
}

/// Status portion of a workload profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileStatus {
    #[serde(default)]
    pub aggregated_metrics: Vec<AggregatedMetrics>,
}

/// Externally-owned workload profile record, keyed by (namespace, name).
///
/// The profile controller owns all mutation; this crate only reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadProfile {
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub status: ProfileStatus,
}

/// Resolved metric value returned to the caller.
///
/// `timestamp_ms` is the timestamp of the snapshot the value was read from,
/// not the query instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    pub name: String,
    pub value: f64,
    pub timestamp_ms: i64,
}

/// Static descriptor for a metric name a store serves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricMeta {
    pub name: String,
}

/// Write-path payload. Stores that do not own ingestion accept and discard
/// these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSample {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub value: f64,
    pub timestamp_ms: i64,
}
