//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (api_port non-zero, addresses parse)
//! - Check registry entries are complete for the selected mode
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig -> Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{ProxyConfig, RegistryMode};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a valid socket address")]
    BindAddress(String),

    #[error("extension.api_port must be non-zero")]
    ApiPort,

    #[error("registry.endpoint `{0}` is not a valid URL")]
    RegistryEndpoint(String),

    #[error("registry.machines[{0}] has an empty id")]
    EmptyMachineId(usize),

    #[error("machine `{id}` maps port `{port}` to an empty address")]
    EmptyServerAddress { id: String, port: String },

    #[error("observability.metrics_address `{0}` is not a valid socket address")]
    MetricsAddress(String),
}

/// Check a parsed configuration for semantic errors, collecting every
/// problem rather than stopping at the first.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.extension.api_port == 0 {
        errors.push(ValidationError::ApiPort);
    }

    match config.registry.mode {
        RegistryMode::Http => {
            if Url::parse(&config.registry.endpoint).is_err() {
                errors.push(ValidationError::RegistryEndpoint(
                    config.registry.endpoint.clone(),
                ));
            }
        }
        RegistryMode::Static => {
            for (index, machine) in config.registry.machines.iter().enumerate() {
                if machine.id.is_empty() {
                    errors.push(ValidationError::EmptyMachineId(index));
                }
                for (port, address) in &machine.servers {
                    if address.is_empty() {
                        errors.push(ValidationError::EmptyServerAddress {
                            id: machine.id.clone(),
                            port: port.clone(),
                        });
                    }
                }
            }
        }
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::StaticMachineConfig;
    use std::collections::HashMap;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ProxyConfig::default()).is_ok());
    }

    #[test]
    fn rejects_zero_api_port() {
        let mut config = ProxyConfig::default();
        config.extension.api_port = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::ApiPort));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.extension.api_port = 0;
        config.registry.endpoint = ":::".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn rejects_incomplete_static_machines() {
        let mut config = ProxyConfig::default();
        config.registry.mode = RegistryMode::Static;
        config.registry.machines.push(StaticMachineConfig {
            id: String::new(),
            servers: HashMap::from([("4301".to_string(), String::new())]),
        });
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::EmptyMachineId(0)));
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::EmptyServerAddress { .. }
        )));
    }
}
