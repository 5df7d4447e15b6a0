//! Record types held by the custody registry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of an entry in the global transfer ledger
pub type SequenceNumber = u64;

/// Identity of a supply-chain participant as supplied by the host
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Create a participant identity
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw identity string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ParticipantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Externally supplied product identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product identifier
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw identifier string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A registered supply-chain actor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Unique identity, fixed at registration
    pub id: ParticipantId,

    /// Display name
    pub name: String,

    /// Free-form role label (manufacturer, distributor, retailer, certifier, ...)
    pub role: String,

    /// Set by the administrator; never cleared
    pub verified: bool,

    /// When the participant registered
    pub registered_at: DateTime<Utc>,
}

impl Participant {
    /// Create an unverified participant
    pub fn new(
        id: ParticipantId,
        name: impl Into<String>,
        role: impl Into<String>,
        registered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            role: role.into(),
            verified: false,
            registered_at,
        }
    }
}

/// A physical item under tracking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier, fixed at creation
    pub id: ProductId,

    pub name: String,

    pub description: String,

    /// Origin label (factory, farm, region)
    pub origin: String,

    pub created_at: DateTime<Utc>,

    /// Participant currently holding the product
    pub custodian: ParticipantId,

    /// Cleared once at end-of-life; an inactive product cannot change hands
    pub active: bool,
}

/// Which operation produced a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Initial entry written when a product is created
    Creation,
    /// Custody moved from `from` to `to`
    Custody,
    /// Certification or inspection note; custody unchanged
    Certification,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntryKind::Creation => "creation",
            EntryKind::Custody => "custody",
            EntryKind::Certification => "certification",
        };
        f.write_str(s)
    }
}

/// One immutable provenance event in the transfer ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEntry {
    pub product_id: ProductId,

    /// Globally unique, strictly increasing across all products
    pub sequence: SequenceNumber,

    pub kind: EntryKind,

    /// Source identity (the administrator for creation entries)
    pub from: ParticipantId,

    /// Destination identity (the custodian for certification entries)
    pub to: ParticipantId,

    pub timestamp: DateTime<Utc>,

    pub location: String,

    pub notes: String,
}
