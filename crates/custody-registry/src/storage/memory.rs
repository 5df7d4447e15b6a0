//! In-memory storage backend
//!
//! Default storage implementation using in-memory maps.
//! Suitable for development, tests and single-instance deployments.
//! Data is lost on restart.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use tracing::debug;

use custody_core::{
    Participant, ParticipantId, Product, ProductId, SequenceNumber, TransferEntry,
};

use super::{Changeset, RegistryStore, StorageError};

#[derive(Debug, Default)]
struct MemoryState {
    participants: HashMap<ParticipantId, Participant>,
    products: HashMap<ProductId, Product>,
    entries: BTreeMap<(ProductId, SequenceNumber), TransferEntry>,
    next_sequence: SequenceNumber,
}

/// In-memory registry store
///
/// All collections live behind one lock so that `apply` is atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistryStore for MemoryStore {
    async fn get_participant(
        &self,
        id: &ParticipantId,
    ) -> Result<Option<Participant>, StorageError> {
        let state = self.state.read().map_err(|_| StorageError::Poisoned)?;
        Ok(state.participants.get(id).cloned())
    }

    async fn list_participants(&self) -> Result<Vec<Participant>, StorageError> {
        let state = self.state.read().map_err(|_| StorageError::Poisoned)?;
        let mut participants: Vec<Participant> = state.participants.values().cloned().collect();
        participants.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(participants)
    }

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, StorageError> {
        let state = self.state.read().map_err(|_| StorageError::Poisoned)?;
        Ok(state.products.get(id).cloned())
    }

    async fn get_entry(
        &self,
        product_id: &ProductId,
        sequence: SequenceNumber,
    ) -> Result<Option<TransferEntry>, StorageError> {
        let state = self.state.read().map_err(|_| StorageError::Poisoned)?;
        Ok(state.entries.get(&(product_id.clone(), sequence)).cloned())
    }

    async fn list_entries(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<TransferEntry>, StorageError> {
        let state = self.state.read().map_err(|_| StorageError::Poisoned)?;
        let start = (product_id.clone(), SequenceNumber::MIN);
        let end = (product_id.clone(), SequenceNumber::MAX);
        Ok(state
            .entries
            .range(start..=end)
            .map(|(_, entry)| entry.clone())
            .collect())
    }

    async fn next_sequence(&self) -> Result<SequenceNumber, StorageError> {
        let state = self.state.read().map_err(|_| StorageError::Poisoned)?;
        Ok(state.next_sequence)
    }

    async fn apply(&self, changes: Changeset) -> Result<(), StorageError> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut state = self.state.write().map_err(|_| StorageError::Poisoned)?;

        // Validate before touching anything so a rejected changeset leaves no trace
        if let Some(ref product) = changes.product {
            let current = state
                .products
                .get(&product.id)
                .map(|p| (&p.custodian, p.active));
            if !changes.product_matches(current) {
                return Err(StorageError::StaleRecord(format!("product '{}'", product.id)));
            }
        }

        if let Some(ref entry) = changes.entry {
            if entry.sequence != state.next_sequence {
                return Err(StorageError::SequenceConflict {
                    expected: state.next_sequence,
                    actual: entry.sequence,
                });
            }
        }

        if let Some(mut participant) = changes.participant {
            debug!(id = %participant.id, "Writing participant");
            if let Some(existing) = state.participants.get(&participant.id) {
                participant.verified |= existing.verified;
            }
            state.participants.insert(participant.id.clone(), participant);
        }

        if let Some(product) = changes.product {
            debug!(id = %product.id, "Writing product");
            state.products.insert(product.id.clone(), product);
        }

        if let Some(entry) = changes.entry {
            debug!(product_id = %entry.product_id, sequence = entry.sequence, "Appending entry");
            state.next_sequence = entry.sequence + 1;
            state
                .entries
                .insert((entry.product_id.clone(), entry.sequence), entry);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use custody_core::EntryKind;

    fn entry(product: &str, sequence: SequenceNumber) -> TransferEntry {
        TransferEntry {
            product_id: product.into(),
            sequence,
            kind: EntryKind::Custody,
            from: "a".into(),
            to: "b".into(),
            timestamp: Utc::now(),
            location: "dock".into(),
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn test_participant_roundtrip() {
        let store = MemoryStore::new();
        let participant = Participant::new("m".into(), "Maker", "manufacturer", Utc::now());

        store
            .apply(Changeset::new().with_participant(participant.clone()))
            .await
            .unwrap();

        assert_eq!(store.get_participant(&"m".into()).await.unwrap(), Some(participant));
        assert!(store.get_participant(&"x".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_entries_advance_counter() {
        let store = MemoryStore::new();
        assert_eq!(store.next_sequence().await.unwrap(), 0);

        store.apply(Changeset::new().with_entry(entry("P1", 0))).await.unwrap();
        store.apply(Changeset::new().with_entry(entry("P2", 1))).await.unwrap();
        store.apply(Changeset::new().with_entry(entry("P1", 2))).await.unwrap();

        assert_eq!(store.next_sequence().await.unwrap(), 3);

        let history = store.list_entries(&"P1".into()).await.unwrap();
        let sequences: Vec<_> = history.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![0, 2]);

        assert!(store.get_entry(&"P2".into(), 1).await.unwrap().is_some());
        assert!(store.get_entry(&"P1".into(), 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sequence_conflict_writes_nothing() {
        let store = MemoryStore::new();
        let participant = Participant::new("m".into(), "Maker", "manufacturer", Utc::now());

        let result = store
            .apply(
                Changeset::new()
                    .with_participant(participant)
                    .with_entry(entry("P1", 5)),
            )
            .await;

        assert!(matches!(
            result,
            Err(StorageError::SequenceConflict { expected: 0, actual: 5 })
        ));
        assert!(store.get_participant(&"m".into()).await.unwrap().is_none());
        assert_eq!(store.next_sequence().await.unwrap(), 0);
    }

    fn product(custodian: &str, active: bool) -> Product {
        Product {
            id: "P1".into(),
            name: "Widget".into(),
            description: String::new(),
            origin: "Plant".into(),
            created_at: Utc::now(),
            custodian: custodian.into(),
            active,
        }
    }

    #[tokio::test]
    async fn test_empty_changeset_is_noop() {
        let store = MemoryStore::new();
        assert!(Changeset::new().is_empty());

        store.apply(Changeset::new()).await.unwrap();

        assert_eq!(store.next_sequence().await.unwrap(), 0);
        assert!(store.list_participants().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_product_insert_rejects_existing() {
        let store = MemoryStore::new();
        store
            .apply(Changeset::new().with_product(product("a", true)))
            .await
            .unwrap();

        let result = store
            .apply(
                Changeset::new()
                    .with_product(product("b", true))
                    .with_entry(entry("P1", 0)),
            )
            .await;

        assert!(matches!(result, Err(StorageError::StaleRecord(_))));
        let stored = store.get_product(&"P1".into()).await.unwrap().unwrap();
        assert_eq!(stored.custodian, ParticipantId::from("a"));
        assert_eq!(store.next_sequence().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_stale_product_update_writes_nothing() {
        let store = MemoryStore::new();
        let original = product("a", true);
        store
            .apply(Changeset::new().with_product(original.clone()))
            .await
            .unwrap();

        // Deactivation commits first
        store
            .apply(Changeset::new().with_product_update(original.clone(), product("a", false)))
            .await
            .unwrap();

        // A transfer prepared against the active record must not revive it
        let result = store
            .apply(
                Changeset::new()
                    .with_product_update(original, product("b", true))
                    .with_entry(entry("P1", 0)),
            )
            .await;

        assert!(matches!(result, Err(StorageError::StaleRecord(_))));
        let stored = store.get_product(&"P1".into()).await.unwrap().unwrap();
        assert!(!stored.active);
        assert_eq!(stored.custodian, ParticipantId::from("a"));
        assert_eq!(store.next_sequence().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_participant_upsert_keeps_verification() {
        let store = MemoryStore::new();
        let mut verified = Participant::new("m".into(), "Maker", "manufacturer", Utc::now());
        verified.verified = true;
        store
            .apply(Changeset::new().with_participant(verified))
            .await
            .unwrap();

        let stale = Participant::new("m".into(), "Maker", "manufacturer", Utc::now());
        store
            .apply(Changeset::new().with_participant(stale))
            .await
            .unwrap();

        assert!(store.get_participant(&"m".into()).await.unwrap().unwrap().verified);
    }

    #[tokio::test]
    async fn test_list_participants_sorted() {
        let store = MemoryStore::new();
        for id in ["zeta", "alpha", "mid"] {
            let p = Participant::new(id.into(), id, "retailer", Utc::now());
            store.apply(Changeset::new().with_participant(p)).await.unwrap();
        }

        let ids: Vec<String> = store
            .list_participants()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id.to_string())
            .collect();
        assert_eq!(ids, vec!["alpha", "mid", "zeta"]);
    }
}
