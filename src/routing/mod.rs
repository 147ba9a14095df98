//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound call (target service, headers, source service)
//!     → filter.rs (rule set lookup)
//!     → matcher.rs (evaluate rules in descending precedence, first match wins)
//!     → distributor.rs (partition instances, weighted random group draw)
//!     → Return: selected instance subset, or the input unchanged
//!
//! Rule installation (config path):
//!     raw YAML → config::parser → RuleSet
//!     → store.rs (atomic snapshot replacement per service / global)
//! ```
//!
//! # Design Decisions
//! - Rule sets are compiled at parse time, immutable at runtime
//! - The request path takes no locks; it reads one snapshot per call
//! - First match wins (ordered by precedence, ties by declaration order)
//! - No rule and no match both mean identity passthrough

pub mod distributor;
pub mod filter;
pub mod instance;
pub mod matcher;
pub mod request;
pub mod rule;
pub mod store;
