//! Store configuration

use anyhow::Result;
use serde::Deserialize;

/// Configuration for the profile-backed metric store
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// The single metric name this store answers for
    #[serde(default = "default_metric_name")]
    pub metric_name: String,

    /// Producer scope whose snapshot history is consulted
    #[serde(default = "default_snapshot_scope")]
    pub snapshot_scope: String,
}

fn default_metric_name() -> String {
    "profile_aggregated_metrics".to_string()
}

fn default_snapshot_scope() -> String {
    "usage-profiler".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            metric_name: default_metric_name(),
            snapshot_scope: default_snapshot_scope(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables (prefix `STORE`)
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("STORE"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_default())
    }
}
