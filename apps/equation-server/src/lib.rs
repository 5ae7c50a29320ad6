//! Equation API server.
//!
//! Hosts the equation solver REST module behind the standard middleware
//! stack: request ids, tracing, timeouts, panic recovery and CORS headers.

pub mod config;
pub mod logging;
pub mod request_id;
pub mod server;
pub mod signals;
