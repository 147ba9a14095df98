//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config path produces:
//!     → logging.rs (reload events, rejected updates)
//!     → metrics.rs (reload counters)
//!
//! request path produces:
//!     → trace-level routing decisions
//!     → passthrough/routed counters
//! ```
//!
//! # Design Decisions
//! - Structured events over the tracing facade; the embedder picks the
//!   subscriber and format
//! - Metrics go through the metrics facade; the embedder installs the
//!   recorder and owns exposition

pub mod logging;
pub mod metrics;
