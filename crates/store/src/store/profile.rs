//! Workload-profile-backed metric store
//!
//! Adapts the aggregated metric history stored on workload profiles to the
//! custom-metric query interface. The store serves a single configured metric
//! name; the actual value is located by selector-derived routing parameters
//! and read out of the latest qualifying snapshot.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use super::resolve::select_snapshot;
use super::MetricStore;
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::lookup::ProfileLister;
use crate::models::{MetricMeta, MetricSample, MetricValue};
use crate::observability::StoreMetrics;
use crate::selector::{MetricQuery, SelectorLabels};

/// Registry name of the profile-backed store
pub const PROFILE_METRIC_STORE: &str = "profile-metric-store";

/// Read-only metric store resolving values from workload profile snapshots
pub struct ProfileMetricStore {
    metric_name: String,
    snapshot_scope: String,
    lister: Arc<dyn ProfileLister>,
    metrics: StoreMetrics,
}

impl ProfileMetricStore {
    pub fn new(config: &StoreConfig, lister: Arc<dyn ProfileLister>) -> Self {
        Self {
            metric_name: config.metric_name.clone(),
            snapshot_scope: config.snapshot_scope.clone(),
            lister,
            metrics: StoreMetrics::new(),
        }
    }

    /// The single metric name this store answers for
    pub fn metric_name(&self) -> &str {
        &self.metric_name
    }

    fn resolve(
        &self,
        namespace: &str,
        metric_name: &str,
        selector: Option<&SelectorLabels>,
        as_of: DateTime<Utc>,
    ) -> Result<MetricValue, StoreError> {
        if metric_name != self.metric_name {
            return Err(StoreError::InvalidQuery(format!(
                "metric name {metric_name} does not match store's metric name {}",
                self.metric_name
            )));
        }

        let labels =
            selector.ok_or_else(|| StoreError::InvalidQuery("metric selector cannot be empty".to_string()))?;
        let query = MetricQuery::from_labels(namespace, labels, as_of)?;

        let profile = self
            .lister
            .get(&query.namespace, &query.profile_name)
            .map_err(|err| {
                warn!(
                    namespace = %query.namespace,
                    profile = %query.profile_name,
                    error = %err,
                    "Workload profile lookup failed"
                );
                err
            })?;

        let snapshot = select_snapshot(
            &profile.status.aggregated_metrics,
            &self.snapshot_scope,
            query.as_of,
        )
        .ok_or_else(|| {
            StoreError::NotFound(format!(
                "no snapshot at or before {} for profile {}",
                query.as_of, query.profile_name
            ))
        })?;

        let container = snapshot
            .containers
            .iter()
            .find(|container| container.name == query.container_name)
            .ok_or_else(|| {
                StoreError::NotFound(format!(
                    "no container {} in selected snapshot",
                    query.container_name
                ))
            })?;

        let quantity = container
            .usage
            .get(&query.resource_key)
            .copied()
            .ok_or_else(|| {
                StoreError::NotFound(format!(
                    "no usage entry {} for container {}",
                    query.resource_key, query.container_name
                ))
            })?;

        debug!(
            namespace = %query.namespace,
            profile = %query.profile_name,
            container = %query.container_name,
            resource = %query.resource_key,
            snapshot_timestamp = %snapshot.timestamp,
            value = quantity.as_f64(),
            "Resolved metric value"
        );

        Ok(MetricValue {
            name: self.metric_name.clone(),
            value: quantity.as_f64(),
            timestamp_ms: snapshot.timestamp.timestamp_millis(),
        })
    }
}

impl MetricStore for ProfileMetricStore {
    fn name(&self) -> &str {
        PROFILE_METRIC_STORE
    }

    fn start(&self) -> Result<()> {
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        Ok(())
    }

    fn insert_metrics(&self, _samples: &[MetricSample]) -> Result<()> {
        // Ingestion is owned by the profile controller; nothing to do here.
        Ok(())
    }

    fn get_metric(
        &self,
        namespace: &str,
        metric_name: &str,
        selector: Option<&SelectorLabels>,
        as_of: DateTime<Utc>,
    ) -> Result<MetricValue, StoreError> {
        let started = Instant::now();
        let result = self.resolve(namespace, metric_name, selector, as_of);
        self.metrics
            .observe_query(started.elapsed().as_secs_f64(), &result);
        result
    }

    fn list_metric_meta(&self, _detailed: bool) -> Vec<MetricMeta> {
        vec![MetricMeta {
            name: self.metric_name.clone(),
        }]
    }
}
