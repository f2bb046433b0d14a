//! HTTPS server module.
//!
//! Wraps the listener in a rustls config loaded from the single key+cert
//! bundle and serves until interrupted. Shutdown on SIGTERM/SIGINT closes
//! the listener and any in-flight connections promptly.

mod server;
mod shutdown;
pub mod static_files;

pub use server::{start_server, ServerError};
