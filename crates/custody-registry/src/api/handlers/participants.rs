//! Participant Handlers
//!
//! Self-registration, administrator verification and participant lookup.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use custody_core::{Participant, ParticipantId};

use crate::api::caller::Caller;
use crate::api::error::ApiError;
use crate::api::handlers::AppState;

const MAX_FIELD_LEN: usize = 256;

/// Request to register the caller as a participant
#[derive(Debug, Deserialize)]
pub struct RegisterParticipantRequest {
    /// Display name
    pub name: String,

    /// Free-form role label
    pub role: String,
}

/// Response from participant registration
#[derive(Debug, Serialize)]
pub struct RegisterParticipantResponse {
    pub id: ParticipantId,
    pub verified: bool,
    pub message: String,
}

/// Response from participant verification
#[derive(Debug, Serialize)]
pub struct VerifyParticipantResponse {
    pub id: ParticipantId,
    pub verified: bool,
}

/// Participant listing
#[derive(Debug, Serialize)]
pub struct ListParticipantsResponse {
    pub participants: Vec<Participant>,
    pub count: usize,
}

/// Register the caller as a participant
///
/// POST /v1/participants
///
/// The new record is keyed by the caller identity and starts unverified.
pub async fn register_participant(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(request): Json<RegisterParticipantRequest>,
) -> Result<Json<RegisterParticipantResponse>, ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Name cannot be empty".into()));
    }

    if request.name.len() > MAX_FIELD_LEN || request.role.len() > MAX_FIELD_LEN {
        return Err(ApiError::BadRequest(format!(
            "Name and role are limited to {} characters",
            MAX_FIELD_LEN
        )));
    }

    state
        .registry
        .register_participant(caller.clone(), request.name, request.role)
        .await?;

    Ok(Json(RegisterParticipantResponse {
        id: caller,
        verified: false,
        message: "Participant registered; awaiting verification".into(),
    }))
}

/// Verify a participant
///
/// POST /v1/participants/{id}/verify
pub async fn verify_participant(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<VerifyParticipantResponse>, ApiError> {
    let id = ParticipantId::new(id);
    state.registry.verify_participant(&caller, &id).await?;

    info!(id = %id, "Participant verified via API");

    Ok(Json(VerifyParticipantResponse { id, verified: true }))
}

/// Get a participant
///
/// GET /v1/participants/{id}
pub async fn get_participant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Participant>, ApiError> {
    let id = ParticipantId::new(id);
    state
        .registry
        .participant(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("participant '{}'", id)))
}

/// List participants
///
/// GET /v1/participants
pub async fn list_participants(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListParticipantsResponse>, ApiError> {
    let participants = state.registry.participants().await?;
    let count = participants.len();

    Ok(Json(ListParticipantsResponse { participants, count }))
}
