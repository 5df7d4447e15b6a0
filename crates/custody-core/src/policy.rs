//! Authorization policy for registry mutations
//!
//! Every mutating registry operation calls exactly one guard from this module
//! before it writes anything. The guards are pure functions over the records
//! the caller looked up for this call; nothing here is cached, so a decision
//! always reflects the state read under the current write lock.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::types::{Participant, ParticipantId, Product};

/// The first authorization condition an operation failed
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    #[error("caller is not the registry administrator")]
    NotAdministrator,

    #[error("caller is not a verified participant")]
    CallerNotVerified,

    #[error("caller is not the current custodian")]
    NotCustodian,

    #[error("product is no longer active")]
    ProductInactive,

    #[error("recipient is not a verified participant")]
    RecipientNotVerified,
}

/// Who may deactivate a product
///
/// Transfer and certification require a verified caller, while deactivation
/// historically only checks custodianship. `CustodianOnly` keeps that
/// behaviour; `VerifiedCustodian` applies the uniform rule and must be opted
/// into explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeactivationPolicy {
    /// Only the current custodian, verified or not
    #[default]
    CustodianOnly,
    /// Only the current custodian, who must also be verified
    VerifiedCustodian,
}

/// Check whether `caller` is the configured administrator
pub fn is_administrator(administrator: &ParticipantId, caller: &ParticipantId) -> bool {
    administrator == caller
}

/// Check whether a participant record exists and is verified
///
/// Unknown identities are never verified.
pub fn is_verified(participant: Option<&Participant>) -> bool {
    participant.map(|p| p.verified).unwrap_or(false)
}

/// Check whether `caller` currently holds `product`
pub fn is_current_custodian(product: &Product, caller: &ParticipantId) -> bool {
    &product.custodian == caller
}

fn deny(denial: Denial, operation: &'static str, caller: &ParticipantId) -> Denial {
    warn!(
        operation = operation,
        caller = %caller,
        reason = %denial,
        "Authorization denied"
    );
    denial
}

/// Guard for marking a participant verified
pub fn authorize_verify(
    administrator: &ParticipantId,
    caller: &ParticipantId,
) -> Result<(), Denial> {
    if !is_administrator(administrator, caller) {
        return Err(deny(Denial::NotAdministrator, "verify", caller));
    }
    Ok(())
}

/// Guard for creating a product
pub fn authorize_create(
    caller: &ParticipantId,
    caller_record: Option<&Participant>,
) -> Result<(), Denial> {
    if !is_verified(caller_record) {
        return Err(deny(Denial::CallerNotVerified, "create", caller));
    }
    Ok(())
}

/// Guard for moving custody of a product
///
/// All four conditions must hold: caller is the custodian, the product is
/// active, the caller is verified and the recipient is verified.
pub fn authorize_transfer(
    product: &Product,
    caller: &ParticipantId,
    caller_record: Option<&Participant>,
    recipient_record: Option<&Participant>,
) -> Result<(), Denial> {
    if !is_current_custodian(product, caller) {
        return Err(deny(Denial::NotCustodian, "transfer", caller));
    }
    if !product.active {
        return Err(deny(Denial::ProductInactive, "transfer", caller));
    }
    if !is_verified(caller_record) {
        return Err(deny(Denial::CallerNotVerified, "transfer", caller));
    }
    if !is_verified(recipient_record) {
        return Err(deny(Denial::RecipientNotVerified, "transfer", caller));
    }
    Ok(())
}

/// Guard for ending a product's tracked lifecycle
pub fn authorize_deactivate(
    product: &Product,
    caller: &ParticipantId,
    caller_record: Option<&Participant>,
    policy: DeactivationPolicy,
) -> Result<(), Denial> {
    if !is_current_custodian(product, caller) {
        return Err(deny(Denial::NotCustodian, "deactivate", caller));
    }
    if policy == DeactivationPolicy::VerifiedCustodian && !is_verified(caller_record) {
        return Err(deny(Denial::CallerNotVerified, "deactivate", caller));
    }
    Ok(())
}

/// Guard for attaching a certification note
///
/// Certification does not look at the product's active flag.
pub fn authorize_certify(
    caller: &ParticipantId,
    caller_record: Option<&Participant>,
) -> Result<(), Denial> {
    if !is_verified(caller_record) {
        return Err(deny(Denial::CallerNotVerified, "certify", caller));
    }
    Ok(())
}
