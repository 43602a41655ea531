//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! request path
//!     → resolver.rs (extract machine id)
//!     → registry lookup (machine metadata)
//!     → port map lookup (extension API server)
//!     → backend base URL, or a typed resolution failure
//! ```
//!
//! # Design Decisions
//! - Resolution is a pure function of (path, registry state); no caching
//! - The path pattern is the single source of truth for id extraction —
//!   no fallback to query parameters or headers

pub mod resolver;

pub use resolver::{machine_id, EndpointResolver, ResolveError, PROXY_PREFIX};
