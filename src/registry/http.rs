//! HTTP-backed machine registry.
//!
//! Queries the platform's machine API for metadata. The API is expected to
//! answer `GET {endpoint}/{machine_id}` with a JSON machine descriptor, or
//! 404 when no such machine exists.

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::registry::machine::{MachineDescriptor, MachineRegistry, RegistryError};

/// Registry client for a remote machine API.
pub struct HttpMachineRegistry {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMachineRegistry {
    /// Create a client for the machine API at `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint: String = endpoint.into();
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl MachineRegistry for HttpMachineRegistry {
    async fn machine(&self, machine_id: &str) -> Result<MachineDescriptor, RegistryError> {
        let url = format!("{}/{}", self.endpoint, machine_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(RegistryError::NotFound(machine_id.to_string())),
            status if status.is_success() => response
                .json::<MachineDescriptor>()
                .await
                .map_err(|e| RegistryError::Unavailable(e.to_string())),
            status => Err(RegistryError::Unavailable(format!(
                "machine API returned {status} for {url}"
            ))),
        }
    }
}
