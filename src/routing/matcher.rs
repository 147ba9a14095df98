//! Rule match evaluation.
//!
//! # Responsibilities
//! - Decide match/no-match for one rule against one request
//! - Combine configured predicates with AND semantics
//! - Treat a missing header as a plain non-match, never an error
//!
//! # Design Decisions
//! - A rule without criteria always matches (wildcard)
//! - Predicates short-circuit on the first failure
//! - Case folding lives in the matcher itself so exact and regex
//!   predicates behave identically

use crate::routing::request::RequestDescriptor;
use crate::routing::rule::{MatchCriteria, Rule, RuleSet};

/// Returns true if `request` satisfies the rule's match criteria.
pub fn rule_matches<Q: RequestDescriptor + ?Sized>(rule: &Rule, request: &Q) -> bool {
    match &rule.criteria {
        None => true,
        Some(criteria) => criteria_match(criteria, request),
    }
}

/// First matching rule in stored (descending precedence) order.
pub fn first_match<'a, Q: RequestDescriptor + ?Sized>(
    rules: &'a RuleSet,
    request: &Q,
) -> Option<&'a Rule> {
    rules.iter().find(|rule| rule_matches(rule, request))
}

fn criteria_match<Q: RequestDescriptor + ?Sized>(criteria: &MatchCriteria, request: &Q) -> bool {
    if let Some(source) = &criteria.source_service {
        if request.source_service() != Some(source.as_str()) {
            return false;
        }
    }
    if !criteria.methods.is_empty() {
        match request.method() {
            Some(method) if criteria.methods.iter().any(|m| m == method) => {}
            _ => return false,
        }
    }
    if let Some(path_matcher) = &criteria.api_path {
        match request.api_path() {
            Some(path) if path_matcher.matches(path) => {}
            _ => return false,
        }
    }
    criteria
        .headers
        .iter()
        .all(|(name, matcher)| match request.header(name) {
            Some(value) => matcher.matches(value),
            None => false,
        })
}
