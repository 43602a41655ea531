//! Endpoint resolution.
//!
//! # Responsibilities
//! - Extract the machine id from the request path
//! - Look up machine metadata in the registry (fresh, per request)
//! - Pick the extension API server from the machine's port map
//! - Produce the backend base URL
//!
//! # Design Decisions
//! - No regex; prefix strip and segment split keep matching O(n)
//! - Every failure cause gets its own variant, even though the proxy
//!   answers 404 for all of them, so logs and tests can tell them apart
//! - Plain HTTP toward machines; the scheme is fixed

use std::sync::Arc;

use thiserror::Error;

use crate::registry::{MachineRegistry, RegistryError};

/// Path prefix under which machine extension APIs are exposed.
pub const PROXY_PREFIX: &str = "/api/ext/";

/// Why a request path could not be resolved to a backend.
///
/// All variants surface to the caller as the same 404; the distinction
/// exists for logging and tests.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Path does not match `/api/ext/{machineId}/**`.
    #[error("path does not address a machine")]
    BadPath,

    /// The registry has no machine with the extracted id.
    #[error("machine `{0}` is unknown")]
    UnknownMachine(String),

    /// The registry could not answer the lookup.
    #[error("registry lookup failed: {0}")]
    RegistryFault(#[source] RegistryError),

    /// The machine exists but exposes no server on the configured port.
    #[error("machine `{machine}` has no server on port {port}")]
    NoSuchPort { machine: String, port: u16 },
}

/// Extract the machine id from a request path.
///
/// The id is the first segment after the proxy prefix; it must be
/// non-empty and followed by a slash (`/api/ext/m1` does not match,
/// `/api/ext/m1/` does).
pub fn machine_id(path: &str) -> Option<&str> {
    let rest = path.strip_prefix(PROXY_PREFIX)?;
    let (id, _) = rest.split_once('/')?;
    if id.is_empty() {
        return None;
    }
    Some(id)
}

/// Resolves inbound request paths to backend base URLs.
///
/// Holds the only two pieces of routing state: the registry reference and
/// the configured extension API port. Both are immutable after
/// construction, so the resolver is freely shared across requests.
pub struct EndpointResolver {
    registry: Arc<dyn MachineRegistry>,
    api_port: u16,
}

impl EndpointResolver {
    /// Create a resolver targeting `api_port` in each machine's port map.
    pub fn new(registry: Arc<dyn MachineRegistry>, api_port: u16) -> Self {
        Self { registry, api_port }
    }

    /// Resolve a request path to a backend base URL.
    ///
    /// Resolution re-runs for every request; machine addresses are never
    /// cached, so routing follows machines as they restart or move.
    pub async fn resolve(&self, path: &str) -> Result<String, ResolveError> {
        let id = machine_id(path).ok_or(ResolveError::BadPath)?;

        let machine = self.registry.machine(id).await.map_err(|e| match e {
            RegistryError::NotFound(id) => ResolveError::UnknownMachine(id),
            fault => ResolveError::RegistryFault(fault),
        })?;

        let server = machine
            .server(self.api_port)
            .ok_or_else(|| ResolveError::NoSuchPort {
                machine: id.to_string(),
                port: self.api_port,
            })?;

        Ok(format!("http://{}", server.address))
    }
}
