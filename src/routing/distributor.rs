//! Weighted instance distribution.
//!
//! # Data Flow
//! ```text
//! winning Rule + live instances
//!     → partition instances into per-group candidate lists (tag equality)
//!     → draw r in [0, total weight), walk cumulative weights
//!     → chosen group's candidate list
//!     → empty? retry once with the fallback groups
//!     → still empty? explicit empty result
//! ```
//!
//! # Design Decisions
//! - The selection strategy is injected so tests can replace the random
//!   draw with a deterministic one
//! - Each call draws independently; no session stickiness
//! - An exhausted selection returns the empty list, never the unfiltered
//!   input: callers must not silently bypass explicit routing policy

use rand::Rng;

use crate::routing::instance::RouteTarget;
use crate::routing::rule::{RouteGroup, Rule};

/// Weighted-selection strategy applied to the winning rule.
pub trait Distributor<T: RouteTarget>: Send + Sync {
    /// Partition `instances` by the rule's groups and select one subset.
    fn distribute(&self, target_service: &str, instances: &[T], rule: &Rule) -> Vec<T>;
}

/// Production distributor: uniform random draw proportional to group
/// weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedDistributor;

impl WeightedDistributor {
    pub fn new() -> Self {
        Self
    }

    fn try_groups<T: RouteTarget + Clone>(
        &self,
        groups: &[RouteGroup],
        target_service: &str,
        instances: &[T],
    ) -> Option<Vec<T>> {
        let partitions = partition(groups, target_service, instances);
        let chosen = pick_group(groups, &mut rand::thread_rng())?;
        let candidates = &partitions[chosen];
        if candidates.is_empty() {
            return None;
        }
        Some(candidates.iter().map(|&instance| instance.clone()).collect())
    }
}

impl<T: RouteTarget + Clone> Distributor<T> for WeightedDistributor {
    fn distribute(&self, target_service: &str, instances: &[T], rule: &Rule) -> Vec<T> {
        if let Some(selected) = self.try_groups(&rule.route, target_service, instances) {
            return selected;
        }
        if !rule.fallback.is_empty() {
            if let Some(selected) = self.try_groups(&rule.fallback, target_service, instances) {
                return selected;
            }
        }
        Vec::new()
    }
}

/// Partition the target service's instances into per-group candidate
/// lists. An instance joins the first group whose tags it satisfies;
/// instances of other services never participate.
pub fn partition<'a, T: RouteTarget>(
    groups: &[RouteGroup],
    target_service: &str,
    instances: &'a [T],
) -> Vec<Vec<&'a T>> {
    let mut partitions: Vec<Vec<&'a T>> = vec![Vec::new(); groups.len()];
    for instance in instances {
        if instance.service_name() != target_service {
            continue;
        }
        if let Some(idx) = groups.iter().position(|group| group.selects(instance)) {
            partitions[idx].push(instance);
        }
    }
    partitions
}

/// Weighted random group index; `None` when the total weight is zero.
pub fn pick_group<R: Rng>(groups: &[RouteGroup], rng: &mut R) -> Option<usize> {
    let total: u64 = groups.iter().map(|group| u64::from(group.weight)).sum();
    if total == 0 {
        return None;
    }
    let mut draw = rng.gen_range(0..total);
    for (idx, group) in groups.iter().enumerate() {
        let weight = u64::from(group.weight);
        if draw < weight {
            return Some(idx);
        }
        draw -= weight;
    }
    None
}
