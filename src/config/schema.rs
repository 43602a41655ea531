//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration for the machine extension proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Extension API targeting.
    pub extension: ExtensionConfig,

    /// Machine registry backend.
    pub registry: RegistryConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Extension API targeting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtensionConfig {
    /// Logical port identifying the extension API service within a
    /// machine's port map. Used as a string key into the map.
    pub api_port: u16,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self { api_port: 4301 }
    }
}

/// Which machine registry implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RegistryMode {
    /// Query a remote machine API over HTTP.
    #[default]
    Http,
    /// Serve machine metadata from the `machines` entries below.
    Static,
}

/// Machine registry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Registry implementation selector.
    pub mode: RegistryMode,

    /// Base URL of the machine API, queried as `{endpoint}/{machine_id}`.
    /// Only used in `http` mode.
    pub endpoint: String,

    /// Static machine entries. Only used in `static` mode.
    pub machines: Vec<StaticMachineConfig>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            mode: RegistryMode::Http,
            endpoint: "http://127.0.0.1:8081/api/internal/machine".to_string(),
            machines: Vec::new(),
        }
    }
}

/// A machine served by the static registry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaticMachineConfig {
    /// Opaque machine identifier.
    pub id: String,

    /// Logical port -> server address (host:port, no scheme).
    #[serde(default)]
    pub servers: HashMap<String, String>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for the complete upstream exchange, in seconds.
    /// Absent means no deadline: the proxy waits as long as the
    /// backend takes.
    pub upstream_secs: Option<u64>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
