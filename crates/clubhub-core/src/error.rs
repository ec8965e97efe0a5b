//! Error types for Clubhub

use clubhub_types::ParseEnumError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClubError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClubError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication required: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Credential error: {0}")]
    Credential(String),
}

impl ClubError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        ClubError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// HTTP status the route layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ClubError::NotFound { .. } => 404,
            ClubError::Conflict(_) => 409,
            ClubError::Validation(_) => 400,
            ClubError::Unauthenticated(_) => 401,
            ClubError::Forbidden(_) => 403,
            ClubError::Storage(_) | ClubError::Credential(_) => 500,
        }
    }
}

impl From<ParseEnumError> for ClubError {
    fn from(e: ParseEnumError) -> Self {
        ClubError::Validation(e.to_string())
    }
}
