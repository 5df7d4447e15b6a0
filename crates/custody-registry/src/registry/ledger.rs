//! Transfer ledger: the append-only provenance log
//!
//! Sequence numbers come from one global counter shared by every product.
//! A product's history is found by listing its entries, never by assuming its
//! numbers are contiguous.

use chrono::{DateTime, Utc};
use tracing::info;

use custody_core::{
    EntryKind, ParticipantId, ProductId, Result, SequenceNumber, TransferEntry,
};

use super::{CustodyRegistry, WriteGuard};
use crate::storage::Changeset;

/// A ledger entry awaiting its sequence number
#[derive(Debug, Clone)]
pub(crate) struct PendingEntry {
    pub product_id: ProductId,
    pub kind: EntryKind,
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub timestamp: DateTime<Utc>,
    pub location: String,
    pub notes: String,
}

impl CustodyRegistry {
    /// Assign the next sequence number to `pending` and commit it with `changes`
    ///
    /// Only product operations call this, while holding the write lock.
    pub(crate) async fn append(
        &self,
        _guard: &WriteGuard<'_>,
        changes: Changeset,
        pending: PendingEntry,
    ) -> Result<SequenceNumber> {
        let sequence = self.store.next_sequence().await?;

        let entry = TransferEntry {
            product_id: pending.product_id,
            sequence,
            kind: pending.kind,
            from: pending.from,
            to: pending.to,
            timestamp: pending.timestamp,
            location: pending.location,
            notes: pending.notes,
        };

        info!(
            product_id = %entry.product_id,
            sequence = sequence,
            kind = %entry.kind,
            from = %entry.from,
            to = %entry.to,
            "Appending ledger entry"
        );

        self.store.apply(changes.with_entry(entry)).await?;
        Ok(sequence)
    }

    /// Look up one ledger entry
    pub async fn entry(
        &self,
        product_id: &ProductId,
        sequence: SequenceNumber,
    ) -> Result<Option<TransferEntry>> {
        Ok(self.store.get_entry(product_id, sequence).await?)
    }

    /// Full provenance history of a product, oldest first
    pub async fn history(&self, product_id: &ProductId) -> Result<Vec<TransferEntry>> {
        Ok(self.store.list_entries(product_id).await?)
    }

    /// Number of ledger entries written so far across all products
    pub async fn entry_count(&self) -> Result<u64> {
        Ok(self.store.next_sequence().await?)
    }
}
