//! Profile lookup interface and the in-process cache backing it

use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::LookupError;
use crate::models::WorkloadProfile;
use crate::observability::StoreMetrics;

/// Read-only indexed access to workload profiles by (namespace, name).
///
/// Implementations are expected to serve from a locally cached,
/// asynchronously updated view of the source of truth; `get` must not block
/// on remote I/O.
pub trait ProfileLister: Send + Sync {
    fn get(&self, namespace: &str, name: &str) -> Result<Arc<WorkloadProfile>, LookupError>;
}

/// Concurrent profile cache fed by an external watch loop.
///
/// The metric store only reads from it; [`CachedProfileLister::apply`] and
/// [`CachedProfileLister::forget`] are driven by whatever owns the watch
/// connection.
pub struct CachedProfileLister {
    profiles: DashMap<(String, String), Arc<WorkloadProfile>>,
    metrics: StoreMetrics,
}

impl Default for CachedProfileLister {
    fn default() -> Self {
        Self::new()
    }
}

impl CachedProfileLister {
    pub fn new() -> Self {
        Self {
            profiles: DashMap::new(),
            metrics: StoreMetrics::new(),
        }
    }

    /// Insert or replace a profile
    pub fn apply(&self, profile: WorkloadProfile) {
        debug!(
            namespace = %profile.namespace,
            name = %profile.name,
            "Caching workload profile"
        );
        self.profiles.insert(
            (profile.namespace.clone(), profile.name.clone()),
            Arc::new(profile),
        );
        self.metrics.set_profiles_cached(self.profiles.len() as i64);
    }

    /// Drop a profile from the cache
    pub fn forget(&self, namespace: &str, name: &str) {
        self.profiles
            .remove(&(namespace.to_string(), name.to_string()));
        self.metrics.set_profiles_cached(self.profiles.len() as i64);
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl ProfileLister for CachedProfileLister {
    fn get(&self, namespace: &str, name: &str) -> Result<Arc<WorkloadProfile>, LookupError> {
        self.profiles
            .get(&(namespace.to_string(), name.to_string()))
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| LookupError::NotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProfileStatus;

    fn profile(namespace: &str, name: &str) -> WorkloadProfile {
        WorkloadProfile {
            namespace: namespace.to_string(),
            name: name.to_string(),
            status: ProfileStatus::default(),
        }
    }

    #[test]
    fn test_apply_then_get() {
        let lister = CachedProfileLister::new();
        lister.apply(profile("default", "web"));

        let found = lister.get("default", "web").unwrap();
        assert_eq!(found.name, "web");
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let lister = CachedProfileLister::new();

        let err = lister.get("default", "web").unwrap_err();
        assert_eq!(
            err,
            LookupError::NotFound {
                namespace: "default".to_string(),
                name: "web".to_string(),
            }
        );
    }

    #[test]
    fn test_forget_removes_profile() {
        let lister = CachedProfileLister::new();
        lister.apply(profile("default", "web"));
        lister.forget("default", "web");

        assert!(lister.is_empty());
        assert!(lister.get("default", "web").is_err());
    }

    #[test]
    fn test_apply_replaces_existing_entry() {
        let lister = CachedProfileLister::new();
        lister.apply(profile("default", "web"));
        lister.apply(profile("default", "web"));

        assert_eq!(lister.len(), 1);
    }
}
