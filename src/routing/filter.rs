//! Router entry point.
//!
//! # Responsibilities
//! - Compose store lookup, match evaluation and weighted distribution
//! - Pass the instance list through untouched when no policy applies
//!
//! # Design Decisions
//! - Stateless between calls; the only shared state is the store snapshot
//! - The distributor is injected per call so the weighted draw can be
//!   replaced by a deterministic strategy in tests

use std::sync::Arc;

use metrics::counter;
use tracing::trace;

use crate::routing::distributor::Distributor;
use crate::routing::instance::RouteTarget;
use crate::routing::matcher;
use crate::routing::request::RequestDescriptor;
use crate::routing::store::RuleStore;

/// Filters a service's live instance list through its routing policy.
pub struct RouterFilter {
    store: Arc<RuleStore>,
}

impl RouterFilter {
    pub fn new(store: Arc<RuleStore>) -> Self {
        Self { store }
    }

    /// Returns the subset of `instances` the current policy allows for
    /// this request. With no rules installed, or no matching rule, the
    /// input list passes through unchanged.
    pub fn filter_instances<T, Q, D>(
        &self,
        instances: &[T],
        target_service: &str,
        request: &Q,
        distributor: &D,
    ) -> Vec<T>
    where
        T: RouteTarget + Clone,
        Q: RequestDescriptor + ?Sized,
        D: Distributor<T> + ?Sized,
    {
        let rules = self.store.lookup(target_service);
        if rules.is_empty() {
            counter!("router_requests_passthrough_total").increment(1);
            return instances.to_vec();
        }
        let Some(rule) = matcher::first_match(&rules, request) else {
            counter!("router_requests_passthrough_total").increment(1);
            trace!(target_service, "no route rule matched");
            return instances.to_vec();
        };
        counter!("router_requests_routed_total").increment(1);
        trace!(
            target_service,
            precedence = rule.precedence,
            "route rule matched"
        );
        distributor.distribute(target_service, instances, rule)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::config::source::{route_rule_key, InMemorySource};
    use crate::routing::rule::Rule;

    #[derive(Debug, Clone, PartialEq)]
    struct Inst {
        version: String,
    }

    impl RouteTarget for Inst {
        fn service_name(&self) -> &str {
            "order-service"
        }

        fn version(&self) -> &str {
            &self.version
        }

        fn tag(&self, _key: &str) -> Option<&str> {
            None
        }
    }

    /// Deterministic strategy recording which rule it was handed.
    struct TakeFirstGroup;

    impl Distributor<Inst> for TakeFirstGroup {
        fn distribute(&self, target_service: &str, instances: &[Inst], rule: &Rule) -> Vec<Inst> {
            let partitions =
                crate::routing::distributor::partition(&rule.route, target_service, instances);
            partitions[0].iter().map(|&i| i.clone()).collect()
        }
    }

    fn fixture(yaml: Option<&str>) -> RouterFilter {
        let (source, _events) = InMemorySource::new();
        let store = Arc::new(RuleStore::new(source.clone()));
        if let Some(yaml) = yaml {
            let key = route_rule_key("order-service");
            source.set(key.clone(), yaml);
            store.on_config_changed([key.as_str()]);
        }
        RouterFilter::new(store)
    }

    #[test]
    fn test_passthrough_without_rules() {
        let filter = fixture(None);
        let instances = vec![
            Inst {
                version: "1.0".to_string(),
            },
            Inst {
                version: "2.0".to_string(),
            },
        ];
        let result = filter.filter_instances(
            &instances,
            "order-service",
            &HashMap::<String, String>::new(),
            &TakeFirstGroup,
        );
        assert_eq!(result, instances);
    }

    #[test]
    fn test_matched_rule_delegates_to_distributor() {
        let filter = fixture(Some(
            "\
- precedence: 1
  route:
    - weight: 100
      tags:
        version: \"2.0\"
",
        ));
        let instances = vec![
            Inst {
                version: "1.0".to_string(),
            },
            Inst {
                version: "2.0".to_string(),
            },
        ];
        let result = filter.filter_instances(
            &instances,
            "order-service",
            &HashMap::<String, String>::new(),
            &TakeFirstGroup,
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].version, "2.0");
    }

    #[test]
    fn test_no_matching_rule_passes_through() {
        let filter = fixture(Some(
            "\
- precedence: 1
  match:
    headers:
      userId:
        exact: \"01\"
  route:
    - weight: 100
      tags:
        version: \"2.0\"
",
        ));
        let instances = vec![Inst {
            version: "1.0".to_string(),
        }];
        let result = filter.filter_instances(
            &instances,
            "order-service",
            &HashMap::<String, String>::new(),
            &TakeFirstGroup,
        );
        assert_eq!(result, instances);
    }
}
