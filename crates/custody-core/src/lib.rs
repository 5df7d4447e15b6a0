//! # Custody Core
//!
//! Record types and authorization rules for a chain-of-custody registry.
//!
//! ## Key Concepts
//!
//! - **Participant**: A supply-chain actor identified by a unique identity
//! - **Product**: A physical item with exactly one current custodian
//! - **Transfer Entry**: One immutable, globally sequenced provenance event
//! - **Policy**: Pure guards deciding whether a caller may mutate a record
//!
//! ## Registry Invariants
//!
//! 1. **Verification**: A participant's verified flag only moves false → true
//! 2. **Lifecycle**: A product's active flag only moves true → false
//! 3. **Ordering**: Ledger sequence numbers strictly increase and are never reused

pub mod clock;
pub mod error;
pub mod policy;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{RegistryError, Result};
pub use policy::{DeactivationPolicy, Denial};
pub use types::{
    EntryKind, Participant, ParticipantId, Product, ProductId, SequenceNumber, TransferEntry,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the library version
pub fn version() -> &'static str {
    VERSION
}
