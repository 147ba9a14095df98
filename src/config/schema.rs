//! Rule configuration schema definitions.
//!
//! This module defines the raw serde shapes for the rule YAML delivered by
//! the configuration collaborator. Field names are camelCase, as rule
//! authors write them.

use std::collections::HashMap;

use serde::Deserialize;
use serde_yaml::Value;

/// One rule object as written in configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleDef {
    /// Evaluation priority; higher values are evaluated first.
    #[serde(default)]
    pub precedence: i32,

    /// Match predicates; absent means the rule is unconditional.
    #[serde(rename = "match")]
    pub match_def: Option<MatchDef>,

    /// Weighted route groups; required for a usable rule.
    #[serde(default)]
    pub route: Vec<RouteGroupDef>,

    /// Optional groups tried when the drawn route group has no live
    /// instance.
    #[serde(default)]
    pub fallback: Vec<RouteGroupDef>,
}

/// Match predicate block of one rule.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDef {
    /// Caller's service name (exact match).
    pub source: Option<String>,

    /// Accepted request methods.
    pub method: Option<Vec<String>>,

    /// Predicate against the request path.
    pub api_path: Option<MatcherDef>,

    /// Header name to predicate mapping; every entry must succeed.
    #[serde(default)]
    pub headers: HashMap<String, MatcherDef>,
}

/// A single exact/regex predicate; exactly one operator must be set.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatcherDef {
    pub exact: Option<ScalarString>,

    pub regex: Option<ScalarString>,

    /// Default false: comparisons are case sensitive.
    #[serde(default)]
    pub case_insensitive: bool,
}

/// One weighted route group.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteGroupDef {
    /// Relative weight; weights need not sum to 100.
    pub weight: u32,

    /// Instance attributes to select on; the key `version` reads the
    /// instance's version attribute.
    #[serde(default)]
    pub tags: HashMap<String, ScalarString>,
}

/// A scalar config value kept in its textual form.
///
/// Rule authors write tag values like `version: 2.0`, which YAML types as
/// a float; comparisons against instance attributes are always textual.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct ScalarString(Value);

impl ScalarString {
    /// The textual form of the scalar; `None` for null, sequences and
    /// mappings.
    pub fn into_text(self) -> Option<String> {
        match self.0 {
            Value::String(text) => Some(text),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        }
    }
}
