//! Explicit store registry
//!
//! Maps store names to constructors so the serving process wires up its
//! stores at startup. There is no global mutable state and no load-time
//! side-effecting registration.

use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::config::StoreConfig;
use crate::store::MetricStore;

/// Constructor for a named store
pub type StoreFactory = Box<dyn Fn(&StoreConfig) -> Result<Arc<dyn MetricStore>> + Send + Sync>;

/// Registry of store constructors keyed by store name
#[derive(Default)]
pub struct StoreRegistry {
    factories: HashMap<String, StoreFactory>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a constructor under a store name, replacing any previous one
    pub fn register(&mut self, name: impl Into<String>, factory: StoreFactory) {
        let name = name.into();
        info!(store = %name, "Registered metric store factory");
        self.factories.insert(name, factory);
    }

    /// Build the store registered under `name`
    pub fn build(&self, name: &str, config: &StoreConfig) -> Result<Arc<dyn MetricStore>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| anyhow!("no metric store registered under {name}"))?;
        factory(config)
    }

    /// Registered store names, sorted for stable output
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
