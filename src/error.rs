use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// AuthError
///
/// Every way a request can fail the authentication layer. The variants are
/// deliberately distinct so callers (and tests) can tell a missing token from a
/// bad one from a stale one, even though all of them map to 401 on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization: Bearer <token>` header was presented.
    #[error("No token provided")]
    MissingToken,
    /// The token was malformed or its signature did not verify.
    #[error("Invalid token")]
    InvalidToken,
    /// The token verified but its expiry has passed. Terminal: there is no
    /// refresh or revocation path, the client must log in again.
    #[error("Token expired")]
    TokenExpired,
    /// Login credentials did not match the configured identity.
    #[error("Invalid credentials provided")]
    InvalidCredentials,
}

/// ValidationError
///
/// A candidate post failed one of the structural rules. Carries the offending
/// field so the message pinpoints it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: &'static str,
}

/// RepoError
///
/// Everything a repository operation can fail with. Validation and not-found
/// are expected business outcomes; `Storage` wraps I/O, serialization and
/// database failures, which propagate to the caller without retry.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Post not found")]
    NotFound { id: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<std::io::Error> for RepoError {
    fn from(err: std::io::Error) -> Self {
        RepoError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(err: serde_json::Error) -> Self {
        RepoError::Storage(err.to_string())
    }
}

impl From<sled::Error> for RepoError {
    fn from(err: sled::Error) -> Self {
        RepoError::Storage(err.to_string())
    }
}

impl From<bincode::error::EncodeError> for RepoError {
    fn from(err: bincode::error::EncodeError) -> Self {
        RepoError::Storage(err.to_string())
    }
}

impl From<bincode::error::DecodeError> for RepoError {
    fn from(err: bincode::error::DecodeError) -> Self {
        RepoError::Storage(err.to_string())
    }
}

// --- HTTP mapping ---
//
// Both error types render the `{"message": "..."}` body the frontend expects.
// Storage causes are logged and replaced with a generic message: internals
// never leak to the client.

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "message": self.to_string() }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

impl IntoResponse for RepoError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            RepoError::NotFound { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            RepoError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            RepoError::Storage(cause) => {
                tracing::error!("storage failure: {cause}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
            }
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}
