//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID assigned and echoed)
//!     → ideas.rs | image_proxy.rs | assets.rs (route handlers)
//!     → response.rs (image relay headers, error mapping)
//!     → Send to client
//! ```

pub mod assets;
pub mod ideas;
pub mod image_proxy;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::AppError;
pub use server::{build_router, AppState, HttpServer};
