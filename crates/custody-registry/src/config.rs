//! Registry and server configuration

use std::env;
use thiserror::Error;

use custody_core::{DeactivationPolicy, ParticipantId};

/// Environment variable naming the administrator identity
pub const ENV_ADMIN: &str = "CUSTODY_REGISTRY_ADMIN";
/// Environment variable for the listen port
pub const ENV_PORT: &str = "CUSTODY_REGISTRY_PORT";
/// Environment variable for the registry's display name
pub const ENV_NAME: &str = "CUSTODY_REGISTRY_NAME";
/// Environment variable enabling verified-custodian deactivation
pub const ENV_STRICT_DEACTIVATION: &str = "CUSTODY_REGISTRY_STRICT_DEACTIVATION";
/// Environment variable for the log level
pub const ENV_LOG_LEVEL: &str = "CUSTODY_REGISTRY_LOG_LEVEL";
/// Environment variable for the PostgreSQL connection string
pub const ENV_DATABASE_URL: &str = "CUSTODY_REGISTRY_DATABASE_URL";

const DEFAULT_PORT: u16 = 8080;

/// Errors raised while reading configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Registry configuration fixed at construction time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// The only identity allowed to verify participants
    pub administrator: ParticipantId,
    /// Who may deactivate a product
    pub deactivation_policy: DeactivationPolicy,
    /// Human-readable name of this registry
    pub name: Option<String>,
}

impl RegistryConfig {
    /// Create a configuration with the given administrator and default policy
    pub fn new(administrator: impl Into<ParticipantId>) -> Self {
        Self {
            administrator: administrator.into(),
            deactivation_policy: DeactivationPolicy::default(),
            name: None,
        }
    }

    /// Set the deactivation policy
    pub fn with_deactivation_policy(mut self, policy: DeactivationPolicy) -> Self {
        self.deactivation_policy = policy;
        self
    }

    /// Set the registry name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Settings for the server binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub registry: RegistryConfig,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
}

impl ServerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let administrator = lookup(ENV_ADMIN)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(ENV_ADMIN))?;

        let port = match lookup(ENV_PORT) {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: ENV_PORT,
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let deactivation_policy = match lookup(ENV_STRICT_DEACTIVATION).as_deref() {
            None | Some("false") | Some("0") => DeactivationPolicy::CustodianOnly,
            Some("true") | Some("1") => DeactivationPolicy::VerifiedCustodian,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: ENV_STRICT_DEACTIVATION,
                    value: other.to_string(),
                })
            }
        };

        let mut registry = RegistryConfig::new(administrator.trim())
            .with_deactivation_policy(deactivation_policy);
        if let Some(name) = lookup(ENV_NAME) {
            registry = registry.with_name(name);
        }

        Ok(Self {
            registry,
            port,
            log_level: lookup(ENV_LOG_LEVEL).unwrap_or_else(|| "info".into()),
            database_url: lookup(ENV_DATABASE_URL),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[(ENV_ADMIN, "registry-admin")])).unwrap();

        assert_eq!(config.registry.administrator, ParticipantId::from("registry-admin"));
        assert_eq!(config.registry.deactivation_policy, DeactivationPolicy::CustodianOnly);
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, "info");
        assert!(config.database_url.is_none());
        assert!(config.registry.name.is_none());
    }

    #[test]
    fn test_missing_admin() {
        assert_eq!(
            ServerConfig::from_lookup(lookup(&[])),
            Err(ConfigError::Missing(ENV_ADMIN))
        );
        assert_eq!(
            ServerConfig::from_lookup(lookup(&[(ENV_ADMIN, "  ")])),
            Err(ConfigError::Missing(ENV_ADMIN))
        );
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            (ENV_ADMIN, "admin"),
            (ENV_PORT, "9090"),
            (ENV_NAME, "Harbor Registry"),
            (ENV_STRICT_DEACTIVATION, "true"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.registry.name.as_deref(), Some("Harbor Registry"));
        assert_eq!(
            config.registry.deactivation_policy,
            DeactivationPolicy::VerifiedCustodian
        );
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[(ENV_ADMIN, "a"), (ENV_PORT, "http")])),
            Err(ConfigError::Invalid { name: ENV_PORT, .. })
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[(ENV_ADMIN, "a"), (ENV_STRICT_DEACTIVATION, "yes")])),
            Err(ConfigError::Invalid { name: ENV_STRICT_DEACTIVATION, .. })
        ));
    }
}
