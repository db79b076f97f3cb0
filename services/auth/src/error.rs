//! Error types for the authentication service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failures surfaced by login, signup and logout
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown user or digest mismatch; the two are deliberately indistinguishable
    #[error("Invalid username or password")]
    AuthenticationFailure,

    /// Valid credentials on a deactivated account
    #[error("Account is blocked")]
    AccountInactive,

    /// A form failed validation; the message is shown to the user
    #[error("{0}")]
    Validation(String),

    /// The persistence collaborator failed
    #[error("Upstream failure: {0}")]
    Upstream(#[from] DatabaseError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::AuthenticationFailure => StatusCode::UNAUTHORIZED,
            AuthError::AccountInactive => StatusCode::FORBIDDEN,
            AuthError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AuthError::Upstream(e) => {
                error!("Authentication upstream failure: {}", e);
                StatusCode::BAD_REQUEST
            }
        };

        let message = match &self {
            AuthError::Upstream(_) => "Request could not be processed".to_string(),
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Type alias for authentication results
pub type AuthResult<T> = Result<T, AuthError>;
