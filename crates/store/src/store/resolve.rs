//! Snapshot selection
//!
//! The heart of the store: pick the most recent snapshot not newer than the
//! query instant from the history written by the expected producer.

use chrono::{DateTime, Utc};

use crate::models::{AggregatedMetrics, MetricSnapshot};

/// Select the latest snapshot with `timestamp <= as_of` among the groups
/// tagged with `scope`.
///
/// Producers append snapshots in non-decreasing timestamp order, but the scan
/// does not trust that: every item is inspected, so an out-of-order sequence
/// still resolves to the true latest qualifying snapshot. When more than one
/// group carries the same scope (a producer misconfiguration), the last group
/// holding a qualifying snapshot wins.
pub(crate) fn select_snapshot<'a>(
    groups: &'a [AggregatedMetrics],
    scope: &str,
    as_of: DateTime<Utc>,
) -> Option<&'a MetricSnapshot> {
    let mut selected: Option<&MetricSnapshot> = None;
    for group in groups.iter().filter(|group| group.scope == scope) {
        let latest = group
            .items
            .iter()
            .filter(|item| item.timestamp <= as_of)
            .max_by_key(|item| item.timestamp);
        if latest.is_some() {
            selected = latest;
        }
    }
    selected
}
