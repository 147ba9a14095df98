//! Shared fixtures for router integration tests.

use std::collections::HashMap;
use std::sync::Arc;

use route_governor::config::source::InMemorySource;
use route_governor::{RouteTarget, RouterFilter, RuleStore};

/// Minimal registry instance shape used across the suites.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceInstance {
    pub id: String,
    pub service: String,
    pub version: String,
    pub tags: HashMap<String, String>,
}

impl ServiceInstance {
    pub fn new(id: &str, service: &str, version: &str) -> Self {
        Self {
            id: id.to_string(),
            service: service.to_string(),
            version: version.to_string(),
            tags: HashMap::new(),
        }
    }

    #[allow(dead_code)]
    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }
}

impl RouteTarget for ServiceInstance {
    fn service_name(&self) -> &str {
        &self.service
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

pub struct RouterFixture {
    pub source: Arc<InMemorySource>,
    pub store: Arc<RuleStore>,
    pub filter: RouterFilter,
}

pub fn router_fixture() -> RouterFixture {
    let (source, _events) = InMemorySource::new();
    let store = Arc::new(RuleStore::new(source.clone()));
    let filter = RouterFilter::new(store.clone());
    RouterFixture {
        source,
        store,
        filter,
    }
}

/// Store a rule document under `key` and deliver the change event the way
/// the configuration collaborator would.
pub fn install_rule(fixture: &RouterFixture, key: &str, yaml: &str) {
    fixture.source.set(key, yaml);
    fixture.store.on_config_changed([key]);
}

#[allow(dead_code)]
pub fn ids(instances: &[ServiceInstance]) -> Vec<&str> {
    instances.iter().map(|i| i.id.as_str()).collect()
}
