//! Ledger Handlers
//!
//! Read-only access to product provenance history.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use custody_core::{ProductId, SequenceNumber, TransferEntry};

use crate::api::error::ApiError;
use crate::api::handlers::AppState;

/// A product's provenance history
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub product_id: ProductId,
    pub entries: Vec<TransferEntry>,
    pub count: usize,
}

/// Get a product's full history, oldest entry first
///
/// GET /v1/products/{id}/history
///
/// Unknown products yield 404 rather than an empty history.
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let product_id = ProductId::new(id);

    if state.registry.product(&product_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("product '{}'", product_id)));
    }

    let entries = state.registry.history(&product_id).await?;
    let count = entries.len();

    Ok(Json(HistoryResponse {
        product_id,
        entries,
        count,
    }))
}

/// Get one ledger entry
///
/// GET /v1/products/{id}/entries/{seq}
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path((id, sequence)): Path<(String, SequenceNumber)>,
) -> Result<Json<TransferEntry>, ApiError> {
    let product_id = ProductId::new(id);
    state
        .registry
        .entry(&product_id, sequence)
        .await?
        .map(Json)
        .ok_or_else(|| {
            ApiError::NotFound(format!("entry {} for product '{}'", sequence, product_id))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CustodyRegistry;
    use axum::http::StatusCode;

    async fn state_with_product() -> Arc<AppState> {
        let registry = CustodyRegistry::in_memory("admin");
        registry
            .register_participant("m".into(), "Maker", "manufacturer")
            .await
            .unwrap();
        registry
            .verify_participant(&"admin".into(), &"m".into())
            .await
            .unwrap();
        registry
            .create_product(&"m".into(), "P1".into(), "Widget", "", "Plant 4")
            .await
            .unwrap();
        registry
            .certify_product(&"m".into(), &"P1".into(), "QA passed", "Plant 4")
            .await
            .unwrap();
        Arc::new(AppState::new(registry))
    }

    #[tokio::test]
    async fn test_history() {
        let state = state_with_product().await;

        let Json(history) = get_history(State(state), Path("P1".to_string()))
            .await
            .unwrap();

        assert_eq!(history.count, 2);
        assert_eq!(history.entries[1].notes, "QA passed");
    }

    #[tokio::test]
    async fn test_history_unknown_product() {
        let state = state_with_product().await;

        let err = get_history(State(state), Path("P2".to_string()))
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_entry() {
        let state = state_with_product().await;

        let Json(entry) = get_entry(State(state.clone()), Path(("P1".to_string(), 0)))
            .await
            .unwrap();
        assert_eq!(entry.sequence, 0);

        let err = get_entry(State(state), Path(("P1".to_string(), 9)))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
