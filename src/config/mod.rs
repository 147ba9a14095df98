//! Rule configuration subsystem.
//!
//! # Data Flow
//! ```text
//! configuration collaborator (raw YAML text per key)
//!     → schema.rs (serde shapes)
//!     → parser.rs (validate, compile regexes, sort by precedence)
//!     → RuleSet (validated, immutable)
//!     → installed into the rule store
//!
//! On change event:
//!     source emits ConfigChange { keys }
//!     → watcher.rs forwards to the store
//!     → store re-fetches, re-parses, atomically swaps the snapshot
//!     → request path observes the new rules
//! ```
//!
//! # Design Decisions
//! - Rules are immutable once parsed; changes replace whole snapshots
//! - Validation separates syntactic (serde) from semantic checks
//! - A failed reload never disturbs the rules already installed

pub mod parser;
pub mod schema;
pub mod source;
pub mod watcher;

pub use parser::RuleConfigError;
pub use source::{ConfigChange, ConfigSource, InMemorySource};
pub use watcher::{FileRuleSource, RuleWatcher};
