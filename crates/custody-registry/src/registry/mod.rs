//! The custody registry state machine
//!
//! Owns the participant, product and ledger collections through a
//! [`RegistryStore`] and enforces the authorization policy on every write.
//!
//! Every mutating operation holds the registry's write lock for its whole
//! read-check-write cycle. Authorization reads and the commit that follows
//! therefore see the same state, and no two mutations interleave. Reads do
//! not take the lock.

mod identity;
mod ledger;
mod products;

pub use products::CREATION_NOTE;

use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

use custody_core::{Clock, ParticipantId, SystemClock};

use crate::config::RegistryConfig;
use crate::storage::{MemoryStore, RegistryStore};

/// Proof that the caller holds the registry's write lock
pub(crate) type WriteGuard<'a> = MutexGuard<'a, ()>;

/// Chain-of-custody registry
///
/// Thread-safe; share it behind an `Arc`.
#[derive(Debug)]
pub struct CustodyRegistry {
    store: Arc<dyn RegistryStore>,
    config: RegistryConfig,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl CustodyRegistry {
    /// Create a registry over `store` using wall-clock timestamps
    pub fn new(config: RegistryConfig, store: Arc<dyn RegistryStore>) -> Self {
        info!(
            administrator = %config.administrator,
            policy = ?config.deactivation_policy,
            name = ?config.name,
            "Custody registry initialized"
        );

        Self {
            store,
            config,
            clock: Arc::new(SystemClock),
            write_lock: Mutex::new(()),
        }
    }

    /// Create a registry backed by a fresh in-memory store
    pub fn in_memory(administrator: impl Into<ParticipantId>) -> Self {
        Self::new(
            RegistryConfig::new(administrator),
            Arc::new(MemoryStore::new()),
        )
    }

    /// Replace the timestamp source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The identity allowed to verify participants
    pub fn administrator(&self) -> &ParticipantId {
        &self.config.administrator
    }

    async fn lock(&self) -> WriteGuard<'_> {
        self.write_lock.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use custody_core::DeactivationPolicy;

    #[test]
    fn test_registry_creation() {
        let registry = CustodyRegistry::in_memory("admin");

        assert_eq!(registry.administrator(), &ParticipantId::from("admin"));
        assert_eq!(
            registry.config().deactivation_policy,
            DeactivationPolicy::CustodianOnly
        );
    }

    #[test]
    fn test_registry_with_config() {
        let config = RegistryConfig::new("root")
            .with_name("Harbor")
            .with_deactivation_policy(DeactivationPolicy::VerifiedCustodian);
        let registry = CustodyRegistry::new(config.clone(), Arc::new(MemoryStore::new()));

        assert_eq!(registry.config(), &config);
    }
}
