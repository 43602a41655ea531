//! Machine Extension Proxy Library
//!
//! Routes inbound `/api/ext/{machineId}/**` requests to the extension API
//! hosted inside the addressed machine, resolving the machine's endpoint
//! through a registry at request time.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registry;
pub mod routing;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
