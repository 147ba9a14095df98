//! Compiled routing rule model.
//!
//! # Responsibilities
//! - Hold the validated, immutable form of one service's routing policy
//! - Keep compiled regexes on the matcher itself (compiled once at parse time)
//! - Freeze rule evaluation order (descending precedence)
//!
//! # Design Decisions
//! - Rules are values: the request path never mutates them
//! - `RuleSet` is shared behind `Arc`, so readers keep a consistent snapshot
//!   while the store swaps in a replacement
//! - Case-insensitive exact values are lowercased once, at construction

use std::collections::HashMap;

use regex::Regex;

use crate::routing::instance::RouteTarget;

/// Tag key that reads an instance's version attribute instead of its
/// generic tag map.
pub const VERSION_TAG: &str = "version";

/// A single value predicate applied to a header or path.
#[derive(Debug, Clone)]
pub enum ValueMatcher {
    /// Full-string comparison. `value` is lowercased at construction when
    /// `case_insensitive` is set.
    Exact { value: String, case_insensitive: bool },
    /// Compiled regular expression, anchored so the pattern must cover the
    /// whole value.
    Regex { regex: Regex },
}

impl ValueMatcher {
    /// Returns true if `value` satisfies this predicate.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            ValueMatcher::Exact {
                value: expected,
                case_insensitive,
            } => {
                if *case_insensitive {
                    value.to_lowercase() == *expected
                } else {
                    value == expected.as_str()
                }
            }
            ValueMatcher::Regex { regex } => regex.is_match(value),
        }
    }
}

/// Match predicates for one rule. Every configured predicate must succeed.
#[derive(Debug, Clone, Default)]
pub struct MatchCriteria {
    /// Exact-match predicate against the caller's declared service name.
    pub source_service: Option<String>,
    /// Accepted request methods; empty means any.
    pub methods: Vec<String>,
    /// Predicate against the request path.
    pub api_path: Option<ValueMatcher>,
    /// Header name / predicate pairs, sorted by name at parse time.
    pub headers: Vec<(String, ValueMatcher)>,
}

/// One weighted destination of a rule: the subset of instances carrying
/// these tags.
#[derive(Debug, Clone)]
pub struct RouteGroup {
    pub weight: u32,
    pub tags: HashMap<String, String>,
}

impl RouteGroup {
    /// True if the instance satisfies every configured tag. The `version`
    /// key reads the instance's version attribute; any other key reads the
    /// generic tag map.
    pub fn selects<T: RouteTarget + ?Sized>(&self, instance: &T) -> bool {
        self.tags.iter().all(|(key, expected)| {
            let actual = if key == VERSION_TAG {
                Some(instance.version())
            } else {
                instance.tag(key)
            };
            actual == Some(expected.as_str())
        })
    }
}

/// One precedence-ordered policy item.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Evaluation priority; higher values are evaluated first.
    pub precedence: i32,
    /// Match predicates; `None` makes the rule unconditional.
    pub criteria: Option<MatchCriteria>,
    /// Weighted route groups; non-empty for any parsed rule.
    pub route: Vec<RouteGroup>,
    /// Groups tried when the drawn route group has no live instance.
    pub fallback: Vec<RouteGroup>,
}

/// The ordered, immutable rule list for one service (or the global key).
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub(crate) fn new(mut rules: Vec<Rule>) -> Self {
        // Stable sort: equal precedences keep their declaration order.
        rules.sort_by(|a, b| b.precedence.cmp(&a.precedence));
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(precedence: i32) -> Rule {
        Rule {
            precedence,
            criteria: None,
            route: vec![RouteGroup {
                weight: 100,
                tags: HashMap::new(),
            }],
            fallback: Vec::new(),
        }
    }

    struct Inst {
        version: String,
        tags: HashMap<String, String>,
    }

    impl RouteTarget for Inst {
        fn service_name(&self) -> &str {
            "svc"
        }

        fn version(&self) -> &str {
            &self.version
        }

        fn tag(&self, key: &str) -> Option<&str> {
            self.tags.get(key).map(String::as_str)
        }
    }

    #[test]
    fn test_rule_set_sorted_by_descending_precedence() {
        let set = RuleSet::new(vec![rule(1), rule(3), rule(2)]);
        let order: Vec<i32> = set.iter().map(|r| r.precedence).collect();
        assert_eq!(order, vec![3, 2, 1]);
    }

    #[test]
    fn test_rule_set_sort_is_stable_for_ties() {
        let mut first = rule(2);
        first.route[0].weight = 1;
        let mut second = rule(2);
        second.route[0].weight = 2;
        let set = RuleSet::new(vec![first, second, rule(5)]);
        let weights: Vec<u32> = set.iter().map(|r| r.route[0].weight).collect();
        assert_eq!(weights, vec![100, 1, 2]);
    }

    #[test]
    fn test_group_selects_on_version_attribute() {
        let group = RouteGroup {
            weight: 10,
            tags: HashMap::from([("version".to_string(), "2.0".to_string())]),
        };
        let matching = Inst {
            version: "2.0".to_string(),
            tags: HashMap::new(),
        };
        let other = Inst {
            version: "1.0".to_string(),
            tags: HashMap::new(),
        };
        assert!(group.selects(&matching));
        assert!(!group.selects(&other));
    }

    #[test]
    fn test_group_selects_on_generic_tags() {
        let group = RouteGroup {
            weight: 10,
            tags: HashMap::from([
                ("az".to_string(), "z1".to_string()),
                ("version".to_string(), "1.0".to_string()),
            ]),
        };
        let matching = Inst {
            version: "1.0".to_string(),
            tags: HashMap::from([("az".to_string(), "z1".to_string())]),
        };
        let missing_tag = Inst {
            version: "1.0".to_string(),
            tags: HashMap::new(),
        };
        assert!(group.selects(&matching));
        assert!(!group.selects(&missing_tag));
    }

    #[test]
    fn test_exact_matcher_case_folding() {
        let sensitive = ValueMatcher::Exact {
            value: "user01".to_string(),
            case_insensitive: false,
        };
        assert!(sensitive.matches("user01"));
        assert!(!sensitive.matches("User01"));

        let insensitive = ValueMatcher::Exact {
            value: "user01".to_string(),
            case_insensitive: true,
        };
        assert!(insensitive.matches("USER01"));
    }
}
