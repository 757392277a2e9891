//! Ideas relay library.
//!
//! Server side of the "Ideas" listing page: a pass-through to the upstream
//! ideas API, an allow-listed image relay with placeholder fallback, and the
//! listing page state model used by the CLI client.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod listing;
pub mod net;
pub mod observability;
pub mod relay;
pub mod resilience;
pub mod security;

pub use config::schema::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
