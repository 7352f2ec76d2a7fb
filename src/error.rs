//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for groups, peers and the HTTP surface.
///
/// Errors are `Clone` so that every caller waiting on one in-flight load
/// receives the same outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Lookups require a non-empty key
    #[error("key is required")]
    EmptyKey,

    /// No group registered under this name
    #[error("no such group: {0}")]
    GroupNotFound(String),

    /// A group with this name already exists
    #[error("duplicate group: {0}")]
    DuplicateGroup(String),

    /// A peer picker was already registered on the group
    #[error("peers already registered for group {0}")]
    PeersAlreadyRegistered(String),

    /// Malformed request
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The group's loader failed
    #[error("{0}")]
    Load(String),

    /// Fetching from a remote peer failed
    #[error("peer fetch failed: {0}")]
    Peer(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<LoadError> for CacheError {
    fn from(err: LoadError) -> Self {
        CacheError::Load(err.to_string())
    }
}

// == Load Error ==
/// Error returned by a group's data loader.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The data source has no value for the key
    #[error("{0} not exist")]
    NotFound(String),

    /// The data source could not be reached
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::EmptyKey | CacheError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::GroupNotFound(_) => StatusCode::NOT_FOUND,
            CacheError::DuplicateGroup(_) | CacheError::PeersAlreadyRegistered(_) => {
                StatusCode::CONFLICT
            }
            CacheError::Load(_) | CacheError::Peer(_) | CacheError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CacheError::EmptyKey, StatusCode::BAD_REQUEST),
            (CacheError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (CacheError::GroupNotFound("g".into()), StatusCode::NOT_FOUND),
            (CacheError::DuplicateGroup("g".into()), StatusCode::CONFLICT),
            (CacheError::Load("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (CacheError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_load_error_message_is_kept_verbatim() {
        let err: CacheError = LoadError::NotFound("kkk".into()).into();
        assert_eq!(err.to_string(), "kkk not exist");
    }
}
