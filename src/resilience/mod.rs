//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Upstream fetch:
//!     → timeouts.rs (per-attempt deadline)
//!     → On failure: backoff.rs (optional delay before the next variant)
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline
//! - Only GETs are ever repeated
//! - No retry budget: the attempt plan is finite and short

pub mod backoff;
pub mod timeouts;
