//! Client side of the scenegen configuration builder.
//!
//! Connects the pure core to the outside world: the HTTP transport that
//! fetches the library catalog and submits generate requests, the sink that
//! saves the returned config file, environment-based configuration, and the
//! [`Session`](session::Session) controller that drives load and generate.

pub mod config;
pub mod http;
pub mod session;
pub mod sink;
pub mod transport;
