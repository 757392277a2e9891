//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → shared via ArcSwap with every handler
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of the AppConfig snapshot
//! ```
//!
//! Listener and TLS settings are read once at startup; everything a handler
//! reads per request picks up the new snapshot.

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::AppConfig;
pub use schema::BannerConfig;
pub use schema::DisguiseConfig;
pub use schema::ImageProxyConfig;
pub use schema::ListenerConfig;
pub use schema::RewriteRule;
