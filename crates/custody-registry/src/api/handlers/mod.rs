//! API request handlers

pub mod ledger;
pub mod participants;
pub mod products;

use crate::CustodyRegistry;

pub use ledger::{get_entry, get_history, HistoryResponse};
pub use participants::{
    get_participant, list_participants, register_participant, verify_participant,
    ListParticipantsResponse, RegisterParticipantRequest, RegisterParticipantResponse,
    VerifyParticipantResponse,
};
pub use products::{
    certify_product, create_product, deactivate_product, get_product, transfer_product,
    CertifyProductRequest, CreateProductRequest, DeactivateProductResponse, LedgerEntryResponse,
    TransferProductRequest,
};

/// Application state shared across handlers
#[derive(Debug)]
pub struct AppState {
    /// The registry every request operates on
    pub registry: CustodyRegistry,
}

impl AppState {
    pub fn new(registry: CustodyRegistry) -> Self {
        Self { registry }
    }
}
