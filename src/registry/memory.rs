//! In-memory machine registry.
//!
//! Serves machine metadata from a fixed map. Used when the proxy is
//! configured with static machine entries, and as the registry double in
//! tests.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::config::schema::StaticMachineConfig;
use crate::registry::machine::{
    MachineDescriptor, MachineRegistry, RegistryError, ServerDescriptor,
};

/// Registry backed by a fixed machine map.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    machines: HashMap<String, MachineDescriptor>,
}

impl InMemoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from static config entries.
    pub fn from_config(entries: &[StaticMachineConfig]) -> Self {
        let mut registry = Self::new();
        for entry in entries {
            let servers = entry
                .servers
                .iter()
                .map(|(port, address)| {
                    (
                        port.clone(),
                        ServerDescriptor {
                            address: address.clone(),
                        },
                    )
                })
                .collect();
            registry.insert(MachineDescriptor {
                id: entry.id.clone(),
                servers,
            });
        }
        registry
    }

    /// Register a machine, replacing any previous entry with the same id.
    pub fn insert(&mut self, machine: MachineDescriptor) {
        self.machines.insert(machine.id.clone(), machine);
    }
}

#[async_trait]
impl MachineRegistry for InMemoryRegistry {
    async fn machine(&self, machine_id: &str) -> Result<MachineDescriptor, RegistryError> {
        self.machines
            .get(machine_id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(machine_id.to_string()))
    }
}
