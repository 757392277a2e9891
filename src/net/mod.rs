//! Network layer subsystem.
//!
//! Plain TCP listeners come straight from Tokio; this module only covers the
//! optional TLS setup for the HTTPS listener.

pub mod tls;
