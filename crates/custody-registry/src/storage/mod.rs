//! Storage abstraction for the custody registry
//!
//! The registry persists three keyed collections plus one counter:
//! - Participants by identity
//! - Products by product identifier
//! - Transfer entries by (product identifier, sequence number)
//! - The global ledger sequence counter
//!
//! Backends never decide authorization. They expose lookups and a single
//! atomic write, [`RegistryStore::apply`], which commits everything one
//! registry operation produced or nothing at all.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;

use async_trait::async_trait;
use custody_core::{
    Participant, ParticipantId, Product, ProductId, RegistryError, SequenceNumber, TransferEntry,
};
use std::fmt::Debug;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Sequence conflict: expected {expected}, got {actual}")]
    SequenceConflict {
        expected: SequenceNumber,
        actual: SequenceNumber,
    },

    #[error("Record changed concurrently: {0}")]
    StaleRecord(String),

    #[error("Storage lock poisoned")]
    Poisoned,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

impl From<StorageError> for RegistryError {
    fn from(err: StorageError) -> Self {
        RegistryError::Storage(err.to_string())
    }
}

/// Every record written by one registry operation
///
/// Participants are upserts whose verified flag never reverts. A product
/// written with [`Changeset::with_product`] must not exist yet; one written
/// with [`Changeset::with_product_update`] must still hold the custodian and
/// active flag it was read with. The entry, if present, must carry the
/// store's next sequence number and advances the counter past it.
#[derive(Debug, Clone, Default)]
pub struct Changeset {
    pub participant: Option<Participant>,
    pub product: Option<Product>,
    /// The product as read before this change, for updates
    pub replaces: Option<Product>,
    pub entry: Option<TransferEntry>,
}

impl Changeset {
    /// Create an empty changeset
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a participant record
    pub fn with_participant(mut self, participant: Participant) -> Self {
        self.participant = Some(participant);
        self
    }

    /// Insert a new product record
    pub fn with_product(mut self, product: Product) -> Self {
        self.product = Some(product);
        self.replaces = None;
        self
    }

    /// Replace `previous` with `product`, failing if the stored record moved on
    pub fn with_product_update(mut self, previous: Product, product: Product) -> Self {
        self.product = Some(product);
        self.replaces = Some(previous);
        self
    }

    /// Append a ledger entry
    pub fn with_entry(mut self, entry: TransferEntry) -> Self {
        self.entry = Some(entry);
        self
    }

    /// True when nothing would be written
    pub fn is_empty(&self) -> bool {
        self.participant.is_none() && self.product.is_none() && self.entry.is_none()
    }

    /// Whether `current` is the state this changeset's product write expects
    pub(crate) fn product_matches(&self, current: Option<(&ParticipantId, bool)>) -> bool {
        match (&self.replaces, current) {
            (None, None) => true,
            (Some(previous), Some((custodian, active))) => {
                previous.custodian == *custodian && previous.active == active
            }
            _ => false,
        }
    }
}

/// Storage backend trait for registry state
///
/// Implementations must be thread-safe. Callers serialize writes; backends
/// only guarantee that a single `apply` is atomic.
#[async_trait]
pub trait RegistryStore: Send + Sync + Debug {
    // =========================================================================
    // Participants
    // =========================================================================

    /// Get a participant by identity
    async fn get_participant(&self, id: &ParticipantId)
        -> Result<Option<Participant>, StorageError>;

    /// List all participants ordered by identity
    async fn list_participants(&self) -> Result<Vec<Participant>, StorageError>;

    // =========================================================================
    // Products
    // =========================================================================

    /// Get a product by identifier
    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, StorageError>;

    // =========================================================================
    // Transfer Ledger
    // =========================================================================

    /// Get one ledger entry by its key
    async fn get_entry(
        &self,
        product_id: &ProductId,
        sequence: SequenceNumber,
    ) -> Result<Option<TransferEntry>, StorageError>;

    /// List a product's entries in ascending sequence order
    async fn list_entries(&self, product_id: &ProductId)
        -> Result<Vec<TransferEntry>, StorageError>;

    /// The sequence number the next appended entry must carry
    async fn next_sequence(&self) -> Result<SequenceNumber, StorageError>;

    // =========================================================================
    // Writes
    // =========================================================================

    /// Atomically commit a changeset
    async fn apply(&self, changes: Changeset) -> Result<(), StorageError>;
}
