//! Machine metadata types and the registry contract.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Runtime metadata for one machine, as reported by the registry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MachineDescriptor {
    /// Opaque machine identifier.
    pub id: String,

    /// Logical port -> server descriptor. Keys are the decimal string
    /// form of the logical port number.
    #[serde(default)]
    pub servers: HashMap<String, ServerDescriptor>,
}

impl MachineDescriptor {
    /// Look up the server bound to a logical port.
    pub fn server(&self, port: u16) -> Option<&ServerDescriptor> {
        self.servers.get(&port.to_string())
    }
}

/// A network-addressable service inside a machine.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerDescriptor {
    /// Reachable address, host:port, no scheme.
    pub address: String,
}

/// Errors reported by a machine registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No machine with the given identifier is registered.
    #[error("machine `{0}` is not registered")]
    NotFound(String),

    /// The registry itself could not answer the lookup.
    #[error("machine registry unavailable: {0}")]
    Unavailable(String),
}

/// Read-only lookup of machine metadata.
///
/// Implementations must be safe for concurrent queries; the proxy performs
/// a fresh lookup for every inbound request and never caches results.
#[async_trait]
pub trait MachineRegistry: Send + Sync {
    /// Fetch the metadata of a machine by its identifier.
    async fn machine(&self, machine_id: &str) -> Result<MachineDescriptor, RegistryError>;
}
