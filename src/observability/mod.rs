//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the relay loop produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! Every request carries an `x-request-id`, set by the HTTP layer and
//! attached to the request span.

pub mod logging;
pub mod metrics;
