//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → [resolver turns path into backend base URL]
//!     → proxy.rs (assemble outbound request, execute exchange)
//!     → headers.rs (verbatim header relay, both directions)
//!     → backend response relayed to client
//! ```

pub mod headers;
pub mod proxy;
pub mod request;
pub mod server;

pub use headers::{HeaderRelay, PassthroughRelay};
pub use proxy::{ProxyClient, ProxyError, ProxyRequest};
pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;
