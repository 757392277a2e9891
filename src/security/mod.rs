//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! /api/image-proxy?url=...
//!     → allow_list.rs (parse target, scheme + domain check)
//!     → 403 before any upstream fetch on rejection
//!
//! Every response:
//!     → headers.rs (nosniff, frame and referrer policy)
//! ```
//!
//! # Design Decisions
//! - Fail closed: an unparseable target is a rejected target
//! - No trust in client input

pub mod allow_list;
pub mod headers;

pub use allow_list::{AllowList, Rejection};
