//! Configuration collaborator interface.
//!
//! # Responsibilities
//! - Define how raw rule text is fetched (`ConfigSource`)
//! - Define the change notification payload (`ConfigChange`)
//! - Name the well-known rule keys
//!
//! # Design Decisions
//! - The router subscribes to change events; it never polls
//! - Sources hand out raw text only; parsing stays in one place

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;

/// Key prefix for per-service route rules; the service name follows the
/// prefix.
pub const ROUTE_RULE_PREFIX: &str = "routing.rule.";

/// Key holding the global rule set used by services with no rules of
/// their own.
pub const GLOBAL_RULE_KEY: &str = "routing.globalRule";

/// Route-rule key for a target service.
pub fn route_rule_key(service: &str) -> String {
    format!("{ROUTE_RULE_PREFIX}{service}")
}

/// Raw configuration text lookup, keyed the way the configuration
/// collaborator delivers it.
pub trait ConfigSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Set of keys whose values changed (added, updated or deleted).
#[derive(Debug, Clone)]
pub struct ConfigChange {
    pub keys: HashSet<String>,
}

impl ConfigChange {
    pub fn single(key: impl Into<String>) -> Self {
        let mut keys = HashSet::new();
        keys.insert(key.into());
        Self { keys }
    }
}

/// In-memory source for tests and embedders that already hold rule text.
///
/// `set` and `remove` emit a change event for the touched key.
pub struct InMemorySource {
    values: DashMap<String, String>,
    events: mpsc::UnboundedSender<ConfigChange>,
}

impl InMemorySource {
    /// Returns the source and the receiver end of its change events.
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<ConfigChange>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                values: DashMap::new(),
                events: tx,
            }),
            rx,
        )
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.values.insert(key.clone(), value.into());
        let _ = self.events.send(ConfigChange::single(key));
    }

    pub fn remove(&self, key: &str) {
        self.values.remove(key);
        let _ = self.events.send(ConfigChange::single(key));
    }
}

impl ConfigSource for InMemorySource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|value| value.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_rule_key_layout() {
        assert_eq!(route_rule_key("order-service"), "routing.rule.order-service");
    }

    #[test]
    fn test_in_memory_source_round_trip() {
        let (source, mut events) = InMemorySource::new();
        assert_eq!(source.get("routing.globalRule"), None);

        source.set("routing.globalRule", "- precedence: 1");
        assert_eq!(
            source.get("routing.globalRule").as_deref(),
            Some("- precedence: 1")
        );
        let change = events.try_recv().unwrap();
        assert!(change.keys.contains("routing.globalRule"));

        source.remove("routing.globalRule");
        assert_eq!(source.get("routing.globalRule"), None);
        let change = events.try_recv().unwrap();
        assert!(change.keys.contains("routing.globalRule"));
    }
}
