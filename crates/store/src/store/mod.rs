//! Metric store interface and the workload-profile-backed implementation

mod profile;
mod resolve;

pub use profile::{ProfileMetricStore, PROFILE_METRIC_STORE};

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::{MetricMeta, MetricSample, MetricValue};
use crate::selector::SelectorLabels;

/// A named source of custom metric values.
///
/// The query path is synchronous and side-effect free; implementations must
/// be safe to share across concurrently querying callers.
pub trait MetricStore: Send + Sync {
    /// Stable name this store is registered and addressed by
    fn name(&self) -> &str;

    fn start(&self) -> Result<()>;

    fn stop(&self) -> Result<()>;

    /// Write path; stores that do not own ingestion accept and discard
    fn insert_metrics(&self, samples: &[MetricSample]) -> Result<()>;

    /// Resolve one metric value as of the given instant.
    ///
    /// `metric_name` must match the store's configured name; the routing
    /// parameters (profile, container, resource key) come from the selector
    /// labels. Callers wanting "the current value" pass `Utc::now()`.
    fn get_metric(
        &self,
        namespace: &str,
        metric_name: &str,
        selector: Option<&SelectorLabels>,
        as_of: DateTime<Utc>,
    ) -> Result<MetricValue, StoreError>;

    /// Static descriptors for the metric names this store serves
    fn list_metric_meta(&self, detailed: bool) -> Vec<MetricMeta>;
}

impl std::fmt::Debug for dyn MetricStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricStore").field("name", &self.name()).finish()
    }
}
