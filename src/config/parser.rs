//! Rule parsing and compilation.
//!
//! # Responsibilities
//! - Turn the raw YAML text for one key into a validated, compiled `RuleSet`
//! - Compile regex matchers once, up front (fail fast)
//! - Sort rules by descending precedence before freezing them
//!
//! # Design Decisions
//! - Validation happens entirely at parse time; the request path only ever
//!   sees well-formed rules
//! - Errors carry the key so the store can keep failures local to it

use regex::RegexBuilder;
use thiserror::Error;
use tracing::debug;

use crate::config::schema::{MatchDef, MatcherDef, RouteGroupDef, RuleDef, ScalarString};
use crate::routing::rule::{MatchCriteria, RouteGroup, Rule, RuleSet, ValueMatcher};

/// Error raised for configuration that cannot be compiled into rules.
#[derive(Debug, Error)]
pub enum RuleConfigError {
    #[error("invalid rule yaml for {key}: {source}")]
    Yaml {
        key: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid regex {pattern:?} for {key}: {source}")]
    Regex {
        key: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid rule for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

impl RuleConfigError {
    fn invalid(key: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Parse the raw YAML for one route-rule key into a compiled `RuleSet`.
pub fn parse_rule_set(key: &str, yaml: &str) -> Result<RuleSet, RuleConfigError> {
    let defs: Vec<RuleDef> = serde_yaml::from_str(yaml).map_err(|source| RuleConfigError::Yaml {
        key: key.to_string(),
        source,
    })?;
    let mut rules = Vec::with_capacity(defs.len());
    for def in defs {
        rules.push(compile_rule(key, def)?);
    }
    debug!(key, rules = rules.len(), "compiled route rules");
    Ok(RuleSet::new(rules))
}

fn compile_rule(key: &str, def: RuleDef) -> Result<Rule, RuleConfigError> {
    if def.route.is_empty() {
        return Err(RuleConfigError::invalid(
            key,
            format!(
                "rule with precedence {} has no route groups",
                def.precedence
            ),
        ));
    }
    let criteria = def
        .match_def
        .map(|match_def| compile_criteria(key, match_def))
        .transpose()?;
    Ok(Rule {
        precedence: def.precedence,
        criteria,
        route: compile_groups(key, def.route)?,
        fallback: compile_groups(key, def.fallback)?,
    })
}

fn compile_criteria(key: &str, def: MatchDef) -> Result<MatchCriteria, RuleConfigError> {
    let mut headers = Vec::with_capacity(def.headers.len());
    for (name, matcher) in def.headers {
        let compiled = compile_matcher(key, &name, matcher)?;
        headers.push((name, compiled));
    }
    // YAML mapping order is not preserved through the map type; a sorted
    // list keeps evaluation and debug output deterministic.
    headers.sort_by(|a, b| a.0.cmp(&b.0));

    let api_path = def
        .api_path
        .map(|matcher| compile_matcher(key, "apiPath", matcher))
        .transpose()?;

    Ok(MatchCriteria {
        source_service: def.source,
        methods: def.method.unwrap_or_default(),
        api_path,
        headers,
    })
}

fn compile_matcher(key: &str, name: &str, def: MatcherDef) -> Result<ValueMatcher, RuleConfigError> {
    let case_insensitive = def.case_insensitive;
    match (def.exact, def.regex) {
        (Some(exact), None) => {
            let text = scalar(key, name, exact)?;
            if text.is_empty() {
                return Err(RuleConfigError::invalid(
                    key,
                    format!("empty exact value for {name}"),
                ));
            }
            let value = if case_insensitive {
                text.to_lowercase()
            } else {
                text
            };
            Ok(ValueMatcher::Exact {
                value,
                case_insensitive,
            })
        }
        (None, Some(regex)) => {
            let pattern = scalar(key, name, regex)?;
            if pattern.is_empty() {
                return Err(RuleConfigError::invalid(
                    key,
                    format!("empty regex for {name}"),
                ));
            }
            // Anchored: the pattern must cover the whole value.
            let regex = RegexBuilder::new(&format!("^(?:{pattern})$"))
                .case_insensitive(case_insensitive)
                .build()
                .map_err(|source| RuleConfigError::Regex {
                    key: key.to_string(),
                    pattern,
                    source,
                })?;
            Ok(ValueMatcher::Regex { regex })
        }
        (None, None) => Err(RuleConfigError::invalid(
            key,
            format!("matcher for {name} needs one of exact/regex"),
        )),
        (Some(_), Some(_)) => Err(RuleConfigError::invalid(
            key,
            format!("matcher for {name} sets both exact and regex"),
        )),
    }
}

fn compile_groups(key: &str, defs: Vec<RouteGroupDef>) -> Result<Vec<RouteGroup>, RuleConfigError> {
    let mut groups = Vec::with_capacity(defs.len());
    for def in defs {
        let mut tags = std::collections::HashMap::with_capacity(def.tags.len());
        for (tag, value) in def.tags {
            let text = scalar(key, &tag, value)?;
            tags.insert(tag, text);
        }
        groups.push(RouteGroup {
            weight: def.weight,
            tags,
        });
    }
    Ok(groups)
}

fn scalar(key: &str, field: &str, value: ScalarString) -> Result<String, RuleConfigError> {
    value
        .into_text()
        .ok_or_else(|| RuleConfigError::invalid(key, format!("{field} must be a scalar value")))
}
