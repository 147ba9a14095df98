//! Governance-Based Weighted Traffic Router
//!
//! For every outbound call to a target service, the router answers "which
//! subset of the currently known server instances may this call be sent
//! to?". Rules arrive as YAML from a configuration collaborator, change at
//! runtime without a restart, and select weighted, tag-filtered instance
//! groups per request.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────────┐
//!                      │                 TRAFFIC ROUTER                 │
//!                      │                                                │
//!   instances +        │  ┌─────────┐   ┌─────────┐   ┌─────────────┐  │
//!   request ───────────┼─▶│ filter  │──▶│ matcher │──▶│ distributor │──┼──▶ selected
//!                      │  └────┬────┘   └─────────┘   └─────────────┘  │    subset
//!                      │       │ lookup                                 │
//!                      │       ▼                                        │
//!                      │  ┌─────────┐   ┌─────────┐   ┌─────────────┐  │
//!   config events ─────┼─▶│ watcher │──▶│  store  │◀──│   parser    │  │
//!                      │  └─────────┘   └─────────┘   └─────────────┘  │
//!                      └───────────────────────────────────────────────┘
//! ```
//!
//! The request path is synchronous and lock-free; the config path swaps
//! immutable rule snapshots behind the store.

// Core subsystems
pub mod config;
pub mod routing;

// Cross-cutting concerns
pub mod observability;

pub use config::parser::RuleConfigError;
pub use config::source::{ConfigChange, ConfigSource, InMemorySource};
pub use config::watcher::{FileRuleSource, RuleWatcher};
pub use routing::distributor::{Distributor, WeightedDistributor};
pub use routing::filter::RouterFilter;
pub use routing::instance::RouteTarget;
pub use routing::request::{RequestDescriptor, RouteRequest};
pub use routing::store::RuleStore;
