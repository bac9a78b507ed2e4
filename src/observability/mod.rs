//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher and startup produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID attached to dispatch log events
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
