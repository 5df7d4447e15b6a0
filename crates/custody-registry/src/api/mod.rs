//! HTTP host adapter for the custody registry

pub mod caller;
pub mod error;
pub mod handlers;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use custody_core::ParticipantId;

use error::ApiError;
use handlers::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Readiness check response
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub administrator: ParticipantId,
    pub participant_count: usize,
    pub entry_count: u64,
}

/// Health check endpoint
///
/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Readiness check endpoint
///
/// GET /ready
pub async fn ready(State(state): State<Arc<AppState>>) -> Result<Json<ReadyResponse>, ApiError> {
    let participant_count = state.registry.participants().await?.len();
    let entry_count = state.registry.entry_count().await?;

    Ok(Json(ReadyResponse {
        ready: true,
        name: state.registry.config().name.clone(),
        administrator: state.registry.administrator().clone(),
        participant_count,
        entry_count,
    }))
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints
        .route("/health", get(health))
        .route("/ready", get(ready))
        // Participant endpoints
        .route(
            "/v1/participants",
            post(handlers::register_participant).get(handlers::list_participants),
        )
        .route("/v1/participants/{id}", get(handlers::get_participant))
        .route("/v1/participants/{id}/verify", post(handlers::verify_participant))
        // Product endpoints
        .route("/v1/products", post(handlers::create_product))
        .route("/v1/products/{id}", get(handlers::get_product))
        .route("/v1/products/{id}/transfer", post(handlers::transfer_product))
        .route("/v1/products/{id}/deactivate", post(handlers::deactivate_product))
        .route("/v1/products/{id}/certify", post(handlers::certify_product))
        // Ledger endpoints
        .route("/v1/products/{id}/history", get(handlers::get_history))
        .route("/v1/products/{id}/entries/{seq}", get(handlers::get_entry))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
