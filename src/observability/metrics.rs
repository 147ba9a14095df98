//! Router metrics.
//!
//! Counters are emitted through the `metrics` facade at their call sites;
//! the embedding chassis owns recorder installation and exposition.
//!
//! # Metrics
//! - `router_rule_reloads_total` (counter): rule snapshots installed
//! - `router_rule_reload_failures_total` (counter): rejected rule updates
//! - `router_requests_passthrough_total` (counter): calls with no rule or
//!   no match
//! - `router_requests_routed_total` (counter): calls handed to the
//!   distributor
//!
//! # Design Decisions
//! - Low-overhead updates only (counter increments, no labels)
//! - No exporter in this crate; a no-op recorder costs nothing
