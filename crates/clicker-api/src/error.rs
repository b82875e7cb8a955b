//! Error types for the game API layer.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.
//!
//! The taxonomy and status mapping:
//!
//! | Variant | Status | Meaning |
//! |---------|--------|---------|
//! | `Unauthorized` | 401 | Missing or invalid credential |
//! | `NotFound` | 404 | Profile or booster absent |
//! | `InvalidInput` | 400 | Malformed sync fields |
//! | `InsufficientPoints` | 400 | Upgrade not affordable |
//! | `Rejected` | 412 | Anti-cheat rejection, with computed bounds |
//! | `Conflict` | 409 | Write conflict persisted past the retry |
//! | `Persistence` / `Internal` | 500 | Store or collaborator failure |
//!
//! Every rejection leaves stored state untouched; the 412 body carries
//! the computed expected/actual numbers to aid client debugging.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use clicker_db::DbError;
use clicker_engine::reconcile::SyncRejection;
use clicker_engine::upgrade::UpgradeError;

use crate::auth::AuthError;

/// Errors that can occur in the game API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request carried no usable credential.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A request field was malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The account cannot afford the upgrade.
    #[error(transparent)]
    InsufficientPoints(#[from] UpgradeError),

    /// The anti-cheat gates rejected the submitted snapshot.
    #[error(transparent)]
    Rejected(SyncRejection),

    /// A write conflict survived the retry.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The persistence layer failed.
    #[error("persistence error: {0}")]
    Persistence(DbError),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DbError> for ApiError {
    fn from(error: DbError) -> Self {
        match error {
            DbError::NotFound { what } => Self::NotFound(what),
            DbError::Conflict { entity } => Self::Conflict(format!("write conflict on {entity}")),
            other => Self::Persistence(other),
        }
    }
}

impl From<SyncRejection> for ApiError {
    fn from(rejection: SyncRejection) -> Self {
        match rejection {
            SyncRejection::InvalidInput { detail } => Self::InvalidInput(detail),
            other => Self::Rejected(other),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::MissingCredential | AuthError::InvalidCredential => {
                Self::Unauthorized(error.to_string())
            }
            AuthError::Provider(detail) => Self::Internal(format!("identity provider: {detail}")),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::InsufficientPoints(error) => (StatusCode::BAD_REQUEST, error.to_string()),
            Self::Rejected(rejection) => (StatusCode::PRECONDITION_FAILED, rejection.to_string()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            Self::Persistence(error) => (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
