//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the logging subsystem for embedders that want a default
//! - Keep log level configurable via the environment
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - Rule reloads log at info, rejected updates at error, per-request
//!   routing decisions at trace only (the request path is hot)

use tracing_subscriber::EnvFilter;

/// Install a default subscriber reading its filter from `RUST_LOG`.
///
/// Embedders with their own subscriber should skip this and collect the
/// crate's events themselves.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}
