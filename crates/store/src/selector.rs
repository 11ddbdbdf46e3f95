//! Label-selector parsing and the typed query built from it
//!
//! Callers address a value with a flat set of selector labels. Three keys are
//! reserved for routing; everything needed downstream is pulled out once,
//! here, into a [`MetricQuery`] so the rest of the store never touches raw
//! label maps.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::error::StoreError;

/// Reserved selector key naming the workload profile to read
pub const SELECTOR_KEY_PROFILE_NAME: &str = "profile_name";
/// Reserved selector key naming the container within the snapshot
pub const SELECTOR_KEY_CONTAINER_NAME: &str = "container_name";
/// Reserved selector key naming the usage entry to extract
pub const SELECTOR_KEY_RESOURCE_NAME: &str = "resource_name";

/// Flat label map derived from a selector expression
pub type SelectorLabels = BTreeMap<String, String>;

/// Parse a `k1=v1,k2=v2` equality selector into a flat label map.
///
/// `==` is accepted as equality and surrounding whitespace is ignored. Empty
/// terms are skipped; set-based operators are not supported.
pub fn parse_selector(expr: &str) -> Result<SelectorLabels, StoreError> {
    let mut labels = SelectorLabels::new();
    for term in expr.split(',') {
        let term = term.trim();
        if term.is_empty() {
            continue;
        }
        let (key, value) = term
            .split_once("==")
            .or_else(|| term.split_once('='))
            .ok_or_else(|| StoreError::InvalidQuery(format!("malformed selector term {term:?}")))?;
        let key = key.trim();
        if key.is_empty() || !is_label_key(key) {
            return Err(StoreError::InvalidQuery(format!(
                "malformed selector term {term:?}"
            )));
        }
        labels.insert(key.to_string(), value.trim().to_string());
    }
    Ok(labels)
}

fn is_label_key(key: &str) -> bool {
    key.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/'))
}

/// Typed query derived from selector labels, validated once at the boundary.
///
/// The metric name on the inbound call is a store identity guard and is not
/// part of the query; the key extracted from a container's usage map is
/// `resource_key`, taken from the `resource_name` label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricQuery {
    pub namespace: String,
    pub profile_name: String,
    pub container_name: String,
    pub resource_key: String,
    /// Reference instant; resolution never returns data from after it
    pub as_of: DateTime<Utc>,
}

impl MetricQuery {
    /// Build a query from a parsed label map.
    ///
    /// Profile and resource names are required. A missing container name is
    /// carried as an empty string and simply matches nothing downstream.
    pub fn from_labels(
        namespace: &str,
        labels: &SelectorLabels,
        as_of: DateTime<Utc>,
    ) -> Result<Self, StoreError> {
        let profile_name = label_value(labels, SELECTOR_KEY_PROFILE_NAME);
        if profile_name.is_empty() {
            return Err(StoreError::InvalidQuery(format!(
                "empty {SELECTOR_KEY_PROFILE_NAME} in selector"
            )));
        }

        let resource_key = label_value(labels, SELECTOR_KEY_RESOURCE_NAME);
        if resource_key.is_empty() {
            return Err(StoreError::InvalidQuery(format!(
                "empty {SELECTOR_KEY_RESOURCE_NAME} in selector"
            )));
        }

        Ok(Self {
            namespace: namespace.to_string(),
            profile_name,
            container_name: label_value(labels, SELECTOR_KEY_CONTAINER_NAME),
            resource_key,
            as_of,
        })
    }
}

fn label_value(labels: &SelectorLabels, key: &str) -> String {
    labels.get(key).cloned().unwrap_or_default()
}
