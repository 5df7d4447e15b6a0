//! Product Handlers
//!
//! Creation, custody transfer, certification and deactivation. Every
//! mutation runs as the identity in the `x-caller-id` header.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use custody_core::{ParticipantId, Product, ProductId, SequenceNumber};

use crate::api::caller::Caller;
use crate::api::error::ApiError;
use crate::api::handlers::AppState;

const MAX_ID_LEN: usize = 256;

/// Request to create a product
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub origin: String,
}

/// Request to hand a product to another participant
#[derive(Debug, Deserialize)]
pub struct TransferProductRequest {
    /// Identity of the new custodian
    pub to: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub notes: String,
}

/// Request to certify a product
#[derive(Debug, Deserialize)]
pub struct CertifyProductRequest {
    pub details: String,
    #[serde(default)]
    pub location: String,
}

/// Response carrying the ledger entry an operation appended
#[derive(Debug, Serialize)]
pub struct LedgerEntryResponse {
    pub product_id: ProductId,
    pub sequence: SequenceNumber,
}

/// Response from product deactivation
#[derive(Debug, Serialize)]
pub struct DeactivateProductResponse {
    pub product_id: ProductId,
    pub active: bool,
}

/// Create a product held by the caller
///
/// POST /v1/products
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(request): Json<CreateProductRequest>,
) -> Result<Json<LedgerEntryResponse>, ApiError> {
    let product_id = request.product_id.trim();
    if product_id.is_empty() {
        return Err(ApiError::BadRequest("Product ID cannot be empty".into()));
    }

    if product_id.len() > MAX_ID_LEN {
        return Err(ApiError::BadRequest(format!(
            "Product ID too long (max {} chars)",
            MAX_ID_LEN
        )));
    }

    let product_id = ProductId::new(product_id);
    let sequence = state
        .registry
        .create_product(
            &caller,
            product_id.clone(),
            request.name,
            request.description,
            request.origin,
        )
        .await?;

    Ok(Json(LedgerEntryResponse { product_id, sequence }))
}

/// Get a product
///
/// GET /v1/products/{id}
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id = ProductId::new(id);
    state
        .registry
        .product(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("product '{}'", id)))
}

/// Transfer custody of a product
///
/// POST /v1/products/{id}/transfer
pub async fn transfer_product(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    Json(request): Json<TransferProductRequest>,
) -> Result<Json<LedgerEntryResponse>, ApiError> {
    if request.to.trim().is_empty() {
        return Err(ApiError::BadRequest("Recipient cannot be empty".into()));
    }

    let product_id = ProductId::new(id);
    let recipient = ParticipantId::new(request.to.trim());
    let sequence = state
        .registry
        .transfer_product(&caller, &product_id, &recipient, request.location, request.notes)
        .await?;

    Ok(Json(LedgerEntryResponse { product_id, sequence }))
}

/// Deactivate a product
///
/// POST /v1/products/{id}/deactivate
pub async fn deactivate_product(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<DeactivateProductResponse>, ApiError> {
    let product_id = ProductId::new(id);
    state
        .registry
        .deactivate_product(&caller, &product_id)
        .await?;

    Ok(Json(DeactivateProductResponse {
        product_id,
        active: false,
    }))
}

/// Certify a product
///
/// POST /v1/products/{id}/certify
pub async fn certify_product(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    Json(request): Json<CertifyProductRequest>,
) -> Result<Json<LedgerEntryResponse>, ApiError> {
    let product_id = ProductId::new(id);
    let sequence = state
        .registry
        .certify_product(&caller, &product_id, request.details, request.location)
        .await?;

    Ok(Json(LedgerEntryResponse { product_id, sequence }))
}
