//! Integration tests for the profile-backed metric store query path

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

use profile_metric_store::{
    parse_selector, AggregatedMetrics, CachedProfileLister, ContainerUsage, LookupError,
    MetricSnapshot, MetricStore, ProfileLister, ProfileMetricStore, ProfileStatus, Quantity,
    StoreConfig, StoreError, WorkloadProfile, PROFILE_METRIC_STORE,
};

fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

fn usage(entries: &[(&str, i64)]) -> BTreeMap<String, Quantity> {
    entries
        .iter()
        .map(|(key, millis)| (key.to_string(), Quantity::from_millis(*millis)))
        .collect()
}

fn snapshot(secs: i64, containers: Vec<ContainerUsage>) -> MetricSnapshot {
    MetricSnapshot {
        timestamp: ts(secs),
        containers,
    }
}

fn app_container(cpu_millis: i64) -> ContainerUsage {
    ContainerUsage {
        name: "app".to_string(),
        usage: usage(&[("cpu", cpu_millis), ("memory", 512_000)]),
    }
}

/// Profile "web" in "default" with app-container CPU snapshots at
/// t=100 (1.0), t=200 (2.5) and t=300 (4.0).
fn web_profile() -> WorkloadProfile {
    WorkloadProfile {
        namespace: "default".to_string(),
        name: "web".to_string(),
        status: ProfileStatus {
            aggregated_metrics: vec![AggregatedMetrics {
                scope: "usage-profiler".to_string(),
                items: vec![
                    snapshot(100, vec![app_container(1_000)]),
                    snapshot(200, vec![app_container(2_500)]),
                    snapshot(300, vec![app_container(4_000)]),
                ],
            }],
        },
    }
}

fn store_with(profile: WorkloadProfile) -> ProfileMetricStore {
    let lister = Arc::new(CachedProfileLister::new());
    lister.apply(profile);
    ProfileMetricStore::new(&StoreConfig::default(), lister)
}

fn web_selector() -> profile_metric_store::SelectorLabels {
    parse_selector("profile_name=web,container_name=app,resource_name=cpu").unwrap()
}

#[test]
fn test_resolves_latest_snapshot_not_after_query_instant() {
    let store = store_with(web_profile());

    let value = store
        .get_metric("default", "profile_aggregated_metrics", Some(&web_selector()), ts(250))
        .unwrap();

    assert_eq!(value.value, 2.5);
    assert_eq!(value.timestamp_ms, ts(200).timestamp_millis());
    assert_eq!(value.name, "profile_aggregated_metrics");
}

#[test]
fn test_boundary_instant_selects_that_snapshot() {
    let store = store_with(web_profile());

    let value = store
        .get_metric("default", "profile_aggregated_metrics", Some(&web_selector()), ts(200))
        .unwrap();

    assert_eq!(value.timestamp_ms, ts(200).timestamp_millis());
}

#[test]
fn test_query_before_earliest_snapshot_is_not_found() {
    let store = store_with(web_profile());

    let err = store
        .get_metric("default", "profile_aggregated_metrics", Some(&web_selector()), ts(50))
        .unwrap_err();

    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn test_metric_name_mismatch_is_invalid_query() {
    let store = store_with(web_profile());

    let err = store
        .get_metric("default", "some_other_metric", Some(&web_selector()), ts(250))
        .unwrap_err();

    assert!(matches!(err, StoreError::InvalidQuery(_)));
}

#[test]
fn test_missing_selector_is_invalid_query() {
    let store = store_with(web_profile());

    let err = store
        .get_metric("default", "profile_aggregated_metrics", None, ts(250))
        .unwrap_err();

    assert!(matches!(err, StoreError::InvalidQuery(_)));
}

#[test]
fn test_unknown_profile_propagates_lookup_error() {
    let store = store_with(web_profile());
    let selector =
        parse_selector("profile_name=api,container_name=app,resource_name=cpu").unwrap();

    let err = store
        .get_metric("default", "profile_aggregated_metrics", Some(&selector), ts(250))
        .unwrap_err();

    match err {
        StoreError::Lookup(LookupError::NotFound { namespace, name }) => {
            assert_eq!(namespace, "default");
            assert_eq!(name, "api");
        }
        other => panic!("expected lookup error, got {other:?}"),
    }
}

#[test]
fn test_snapshots_from_other_scopes_are_ignored() {
    let mut profile = web_profile();
    profile.status.aggregated_metrics[0].scope = "other-producer".to_string();
    let store = store_with(profile);

    let err = store
        .get_metric("default", "profile_aggregated_metrics", Some(&web_selector()), ts(250))
        .unwrap_err();

    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn test_unknown_container_is_not_found() {
    let store = store_with(web_profile());
    let selector =
        parse_selector("profile_name=web,container_name=sidecar,resource_name=cpu").unwrap();

    let err = store
        .get_metric("default", "profile_aggregated_metrics", Some(&selector), ts(250))
        .unwrap_err();

    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn test_resource_key_in_other_container_does_not_match() {
    let mut profile = web_profile();
    // "app" loses its cpu entry; a sidecar in the same snapshots keeps one.
    for item in &mut profile.status.aggregated_metrics[0].items {
        item.containers[0].usage.remove("cpu");
        item.containers.push(ContainerUsage {
            name: "sidecar".to_string(),
            usage: usage(&[("cpu", 9_000)]),
        });
    }
    let store = store_with(profile);

    let err = store
        .get_metric("default", "profile_aggregated_metrics", Some(&web_selector()), ts(250))
        .unwrap_err();

    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn test_repeated_queries_are_idempotent_and_isolated() {
    let store = store_with(web_profile());

    let mut first = store
        .get_metric("default", "profile_aggregated_metrics", Some(&web_selector()), ts(250))
        .unwrap();
    let expected = first.clone();

    // Mutating the returned value must not leak into backing data.
    first.value = -1.0;
    first.timestamp_ms = 0;

    let second = store
        .get_metric("default", "profile_aggregated_metrics", Some(&web_selector()), ts(250))
        .unwrap();
    assert_eq!(second, expected);
}

#[test]
fn test_concurrent_queries_do_not_interfere() {
    let store = store_with(web_profile());

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for as_of in [150, 250, 350] {
                    let value = store
                        .get_metric(
                            "default",
                            "profile_aggregated_metrics",
                            Some(&web_selector()),
                            ts(as_of),
                        )
                        .unwrap();
                    let expected = match as_of {
                        150 => 1.0,
                        250 => 2.5,
                        _ => 4.0,
                    };
                    assert_eq!(value.value, expected);
                }
            });
        }
    });
}

#[test]
fn test_insert_metrics_is_a_no_op() {
    let store = store_with(web_profile());

    store.insert_metrics(&[]).unwrap();

    // The write path does not disturb the read path.
    let value = store
        .get_metric("default", "profile_aggregated_metrics", Some(&web_selector()), ts(250))
        .unwrap();
    assert_eq!(value.value, 2.5);
}

#[test]
fn test_list_metric_meta_returns_single_descriptor() {
    let store = store_with(web_profile());

    let meta = store.list_metric_meta(false);
    assert_eq!(meta.len(), 1);
    assert_eq!(meta[0].name, "profile_aggregated_metrics");
    assert_eq!(meta, store.list_metric_meta(true));
}

#[test]
fn test_lifecycle_passthroughs() {
    let store = store_with(web_profile());

    assert_eq!(store.name(), PROFILE_METRIC_STORE);
    store.start().unwrap();
    store.stop().unwrap();
}

#[test]
fn test_profile_update_is_visible_to_next_query() {
    let lister = Arc::new(CachedProfileLister::new());
    lister.apply(web_profile());
    let store =
        ProfileMetricStore::new(&StoreConfig::default(), Arc::clone(&lister) as Arc<dyn ProfileLister>);

    let before = store
        .get_metric("default", "profile_aggregated_metrics", Some(&web_selector()), ts(500))
        .unwrap();
    assert_eq!(before.value, 4.0);

    let mut updated = web_profile();
    updated.status.aggregated_metrics[0]
        .items
        .push(snapshot(400, vec![app_container(6_000)]));
    lister.apply(updated);

    let after = store
        .get_metric("default", "profile_aggregated_metrics", Some(&web_selector()), ts(500))
        .unwrap();
    assert_eq!(after.value, 6.0);
}
