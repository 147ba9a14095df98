//! Rule cache with event-driven reload.
//!
//! # Data Flow
//! ```text
//! ConfigChange { keys }
//!     → on_config_changed
//!     → ConfigSource::get (raw YAML per key)
//!     → parser (compile + sort)
//!     → atomic snapshot replacement (service entry or global reference)
//!
//! Request path:
//!     lookup(service) → service entry | global set
//! ```
//!
//! # Design Decisions
//! - The read path is lock-free: one map lookup hands out an immutable
//!   `Arc<RuleSet>` snapshot
//! - Writers replace whole snapshots, never mutate in place; last write
//!   wins for concurrent writers of the same key
//! - A failed parse keeps the previously installed snapshot for that key
//! - An absent, blank or empty update removes the service entry, so the
//!   service falls back to the global set (shadowing, not merging)

use std::sync::Arc;

use arc_swap::ArcSwap;
use dashmap::DashMap;
use metrics::counter;
use tracing::{error, info};

use crate::config::parser::parse_rule_set;
use crate::config::source::{ConfigSource, GLOBAL_RULE_KEY, ROUTE_RULE_PREFIX};
use crate::routing::rule::RuleSet;

/// Per-service rule snapshots plus the global fallback set.
pub struct RuleStore {
    source: Arc<dyn ConfigSource>,
    service_rules: DashMap<String, Arc<RuleSet>>,
    global_rules: ArcSwap<RuleSet>,
}

impl RuleStore {
    /// Create a store bound to a configuration source. The global rule
    /// key is loaded eagerly; per-service entries are created on first
    /// config delivery.
    pub fn new(source: Arc<dyn ConfigSource>) -> Self {
        let store = Self {
            source,
            service_rules: DashMap::new(),
            global_rules: ArcSwap::from_pointee(RuleSet::default()),
        };
        store.reload_key(GLOBAL_RULE_KEY);
        store
    }

    /// Current rule snapshot for a service: its own set when one is
    /// installed, else the global set (possibly empty).
    pub fn lookup(&self, service: &str) -> Arc<RuleSet> {
        if let Some(entry) = self.service_rules.get(service) {
            return entry.value().clone();
        }
        self.global_rules.load_full()
    }

    /// Apply a configuration change notification. Keys that are not route
    /// rule keys are ignored; failures stay local to their key.
    pub fn on_config_changed<'a, I>(&self, changed_keys: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for key in changed_keys {
            if key == GLOBAL_RULE_KEY || key.starts_with(ROUTE_RULE_PREFIX) {
                self.reload_key(key);
            }
        }
    }

    fn reload_key(&self, key: &str) {
        let raw = match self.source.get(key) {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                self.clear_key(key);
                return;
            }
        };
        match parse_rule_set(key, &raw) {
            Ok(rules) if rules.is_empty() => self.clear_key(key),
            Ok(rules) => {
                counter!("router_rule_reloads_total").increment(1);
                info!(key, rules = rules.len(), "installed route rules");
                self.install(key, Arc::new(rules));
            }
            Err(err) => {
                // The previously installed snapshot stays live for this key.
                counter!("router_rule_reload_failures_total").increment(1);
                error!(key, error = %err, "ignoring invalid route rule update");
            }
        }
    }

    fn install(&self, key: &str, rules: Arc<RuleSet>) {
        if key == GLOBAL_RULE_KEY {
            self.global_rules.store(rules);
        } else if let Some(service) = key.strip_prefix(ROUTE_RULE_PREFIX) {
            self.service_rules.insert(service.to_string(), rules);
        }
    }

    fn clear_key(&self, key: &str) {
        if key == GLOBAL_RULE_KEY {
            self.global_rules.store(Arc::new(RuleSet::default()));
        } else if let Some(service) = key.strip_prefix(ROUTE_RULE_PREFIX) {
            if self.service_rules.remove(service).is_some() {
                info!(service, "cleared service route rules");
            }
        }
    }
}
