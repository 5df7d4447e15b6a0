//! Error types for the custody registry

use thiserror::Error;

use crate::policy::Denial;

/// Result type alias using RegistryError
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors returned by registry operations
///
/// None of these are transient: each reflects caller input or authorization
/// state and is returned to the caller as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Caller lacks the administrator role, custodianship or verification
    #[error("Not authorized: {0}")]
    NotAuthorized(#[from] Denial),

    /// Referenced participant or product has no record
    #[error("Not found: {0}")]
    NotFound(String),

    /// Creation collides with an existing record key
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Storage backend failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl RegistryError {
    /// Short machine-readable code for this error kind
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::NotAuthorized(_) => "NOT_AUTHORIZED",
            RegistryError::NotFound(_) => "NOT_FOUND",
            RegistryError::AlreadyExists(_) => "ALREADY_EXISTS",
            RegistryError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denial_converts_to_not_authorized() {
        let err: RegistryError = Denial::ProductInactive.into();

        assert_eq!(err, RegistryError::NotAuthorized(Denial::ProductInactive));
        assert_eq!(err.code(), "NOT_AUTHORIZED");
        assert_eq!(err.to_string(), "Not authorized: product is no longer active");
    }
}
