//! Read-only custom-metric store backed by workload profile snapshots
//!
//! This crate resolves scalar metric values for named containers from the
//! time-ordered aggregate metric history attached to workload profiles:
//! - Typed query construction from label selectors
//! - Latest-not-after snapshot selection per producer scope
//! - Profile lookup through a pluggable, cache-backed lister
//! - Explicit registry wiring stores by name at process startup

pub mod config;
pub mod error;
pub mod lookup;
pub mod models;
pub mod observability;
pub mod registry;
pub mod selector;
pub mod store;

pub use config::StoreConfig;
pub use error::{LookupError, StoreError};
pub use lookup::{CachedProfileLister, ProfileLister};
pub use models::*;
pub use observability::StoreMetrics;
pub use registry::{StoreFactory, StoreRegistry};
pub use selector::{
    parse_selector, MetricQuery, SelectorLabels, SELECTOR_KEY_CONTAINER_NAME,
    SELECTOR_KEY_PROFILE_NAME, SELECTOR_KEY_RESOURCE_NAME,
};
pub use store::{MetricStore, ProfileMetricStore, PROFILE_METRIC_STORE};
