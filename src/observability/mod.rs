//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape, disabled by default)
//! ```
//!
//! # Design Decisions
//! - Request ID (`x-request-id`) set by tower-http and carried into the trace span
//! - Metrics are cheap (atomic increments) and inert without a recorder

pub mod logging;
pub mod metrics;
