//! Participant registration and verification

use tracing::{info, warn};

use custody_core::{policy, Participant, ParticipantId, RegistryError, Result};

use super::CustodyRegistry;
use crate::storage::Changeset;

impl CustodyRegistry {
    /// Register `id` as a new, unverified participant
    ///
    /// Fails with `AlreadyExists` if the identity is taken; the existing
    /// record is left untouched.
    pub async fn register_participant(
        &self,
        id: ParticipantId,
        name: impl Into<String>,
        role: impl Into<String>,
    ) -> Result<()> {
        let _guard = self.lock().await;

        if self.store.get_participant(&id).await?.is_some() {
            warn!(id = %id, "Participant already registered");
            return Err(RegistryError::AlreadyExists(format!("participant '{}'", id)));
        }

        let participant = Participant::new(id, name, role, self.clock.now());
        info!(
            id = %participant.id,
            name = %participant.name,
            role = %participant.role,
            "Registering participant"
        );
        self.store
            .apply(Changeset::new().with_participant(participant))
            .await?;

        Ok(())
    }

    /// Mark a participant verified
    ///
    /// Only the administrator may call this. Verifying an already-verified
    /// participant succeeds without writing.
    pub async fn verify_participant(
        &self,
        caller: &ParticipantId,
        id: &ParticipantId,
    ) -> Result<()> {
        let _guard = self.lock().await;

        policy::authorize_verify(&self.config.administrator, caller)?;

        let mut participant = self
            .store
            .get_participant(id)
            .await?
            .ok_or_else(|| RegistryError::NotFound(format!("participant '{}'", id)))?;

        if participant.verified {
            info!(id = %id, "Participant already verified");
            return Ok(());
        }

        participant.verified = true;
        self.store
            .apply(Changeset::new().with_participant(participant))
            .await?;

        info!(id = %id, verified_by = %caller, "Verified participant");
        Ok(())
    }

    /// Check whether `id` is a verified participant
    ///
    /// Unknown identities are reported as unverified.
    pub async fn is_verified(&self, id: &ParticipantId) -> Result<bool> {
        let participant = self.store.get_participant(id).await?;
        Ok(policy::is_verified(participant.as_ref()))
    }

    /// Look up a participant
    pub async fn participant(&self, id: &ParticipantId) -> Result<Option<Participant>> {
        Ok(self.store.get_participant(id).await?)
    }

    /// List all participants ordered by identity
    pub async fn participants(&self) -> Result<Vec<Participant>> {
        Ok(self.store.list_participants().await?)
    }
}

#[cfg(test)]
mod tests {
    use custody_core::Denial;

    use super::*;

    #[tokio::test]
    async fn test_register_and_lookup() {
        let registry = CustodyRegistry::in_memory("admin");

        registry
            .register_participant("m".into(), "Maker Co", "manufacturer")
            .await
            .unwrap();

        let participant = registry.participant(&"m".into()).await.unwrap().unwrap();
        assert_eq!(participant.name, "Maker Co");
        assert_eq!(participant.role, "manufacturer");
        assert!(!participant.verified);
        assert!(registry.participant(&"nobody".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_registration_keeps_original() {
        let registry = CustodyRegistry::in_memory("admin");
        registry
            .register_participant("m".into(), "Maker Co", "manufacturer")
            .await
            .unwrap();

        let err = registry
            .register_participant("m".into(), "Impostor", "retailer")
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::AlreadyExists(_)));
        let participant = registry.participant(&"m".into()).await.unwrap().unwrap();
        assert_eq!(participant.name, "Maker Co");
        assert_eq!(participant.role, "manufacturer");
    }

    #[tokio::test]
    async fn test_verify_by_administrator() {
        let registry = CustodyRegistry::in_memory("admin");
        registry
            .register_participant("m".into(), "Maker Co", "manufacturer")
            .await
            .unwrap();

        assert!(!registry.is_verified(&"m".into()).await.unwrap());
        registry
            .verify_participant(&"admin".into(), &"m".into())
            .await
            .unwrap();
        assert!(registry.is_verified(&"m".into()).await.unwrap());

        // idempotent
        registry
            .verify_participant(&"admin".into(), &"m".into())
            .await
            .unwrap();
        assert!(registry.is_verified(&"m".into()).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_by_non_administrator() {
        let registry = CustodyRegistry::in_memory("admin");
        registry
            .register_participant("m".into(), "Maker Co", "manufacturer")
            .await
            .unwrap();

        let err = registry
            .verify_participant(&"m".into(), &"m".into())
            .await
            .unwrap_err();

        assert_eq!(err, RegistryError::NotAuthorized(Denial::NotAdministrator));
        assert!(!registry.is_verified(&"m".into()).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_unknown_participant() {
        let registry = CustodyRegistry::in_memory("admin");

        let err = registry
            .verify_participant(&"admin".into(), &"ghost".into())
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::NotFound(_)));
        assert!(!registry.is_verified(&"ghost".into()).await.unwrap());
    }
}
