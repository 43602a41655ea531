//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! startup:
//!     logging.rs  → tracing subscriber (env filter + fmt layer)
//!     metrics.rs  → Prometheus exporter on its own listener
//!
//! per request:
//!     server handler → metrics::record_request(method, status, start)
//! ```

pub mod logging;
pub mod metrics;
