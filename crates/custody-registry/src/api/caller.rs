//! Caller identity supplied by the host
//!
//! The registry trusts whatever identity the fronting host puts in the
//! `x-caller-id` header. Authenticating that identity is the host's job.

use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};

use custody_core::ParticipantId;

use crate::api::error::ApiError;

/// Header carrying the caller identity
pub const CALLER_HEADER: &str = "x-caller-id";

/// The identity on whose behalf a request runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub ParticipantId);

impl Caller {
    /// Read the caller identity from request headers
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, ApiError> {
        let value = headers
            .get(CALLER_HEADER)
            .ok_or_else(|| ApiError::Unauthenticated(format!("missing {} header", CALLER_HEADER)))?;

        let id = value
            .to_str()
            .map_err(|_| ApiError::BadRequest(format!("{} header is not valid text", CALLER_HEADER)))?
            .trim();

        if id.is_empty() {
            return Err(ApiError::Unauthenticated(format!("empty {} header", CALLER_HEADER)));
        }

        Ok(Caller(ParticipantId::new(id)))
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Caller::from_headers(&parts.headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};

    #[test]
    fn test_caller_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert(CALLER_HEADER, HeaderValue::from_static(" acme "));

        let caller = Caller::from_headers(&headers).unwrap();
        assert_eq!(caller, Caller(ParticipantId::from("acme")));
    }

    #[test]
    fn test_missing_or_empty_caller() {
        let headers = HeaderMap::new();
        let err = Caller::from_headers(&headers).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let mut headers = HeaderMap::new();
        headers.insert(CALLER_HEADER, HeaderValue::from_static(""));
        let err = Caller::from_headers(&headers).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }
}
