//! Image relay subsystem.
//!
//! # Data Flow
//! ```text
//! allow-listed target URL
//!     → attempt.rs (candidate URLs × disguises, capped)
//!     → strategy.rs (sequential loop, first image wins)
//!         → fetcher.rs (one GET under a deadline)
//!     → on total failure: placeholder attempt
//!     → RelayOutcome handed back to the HTTP handler
//! ```
//!
//! # Design Decisions
//! - Attempts are sequential awaits, never raced
//! - A failed attempt is logged and counted, then forgotten
//! - A 2xx answer only counts when it is actually an image

pub mod attempt;
pub mod fetcher;
pub mod strategy;

pub use attempt::{build_plan, placeholder_attempt, Attempt};
pub use fetcher::{FetchedImage, HttpFetcher, ImageFetcher, RelayError};
pub use strategy::{ImageRelay, RelayOutcome};
