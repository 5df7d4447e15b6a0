//! Custody Registry Server
//!
//! Records the chain of custody of physical products from creation through
//! successive ownership transfers to end-of-life:
//! - Participants self-register and are verified by a configured administrator
//! - Verified participants create products and hand them on
//! - Every creation, transfer and certification appends an immutable,
//!   globally sequenced ledger entry
//! - The current custodian may end a product's tracked lifecycle
//!
//! ## Registry Invariants
//!
//! 1. **SERIALIZATION**: Mutations run one at a time under a single write lock
//! 2. **ATOMICITY**: A mutation commits its record change and ledger entry together or not at all
//! 3. **ORDERING**: Ledger sequence numbers come from one global counter and never repeat
//!
//! ## API Endpoints
//!
//! - `GET /health` - Liveness check
//! - `GET /ready` - Readiness check with registry counts
//! - `POST /v1/participants` - Register the caller as a participant
//! - `GET /v1/participants` - List participants
//! - `GET /v1/participants/{id}` - Get a participant
//! - `POST /v1/participants/{id}/verify` - Verify a participant (administrator only)
//! - `POST /v1/products` - Create a product
//! - `GET /v1/products/{id}` - Get a product
//! - `POST /v1/products/{id}/transfer` - Transfer custody
//! - `POST /v1/products/{id}/deactivate` - End a product's lifecycle
//! - `POST /v1/products/{id}/certify` - Attach a certification note
//! - `GET /v1/products/{id}/history` - Full provenance history
//! - `GET /v1/products/{id}/entries/{seq}` - One ledger entry

pub mod api;
pub mod config;
pub mod registry;
pub mod storage;

pub use api::create_router;
pub use api::handlers::AppState;
pub use config::{ConfigError, RegistryConfig, ServerConfig};
pub use registry::{CustodyRegistry, CREATION_NOTE};
pub use storage::{Changeset, MemoryStore, RegistryStore, StorageError};
#[cfg(feature = "postgres")]
pub use storage::PostgresStore;
