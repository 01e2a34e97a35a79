// Authentication and authorization error types

use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::auth::token::TokenError;
use crate::error::ApiError;

/// Message returned when a protected endpoint is hit without a principal
pub const AUTHENTICATION_REQUIRED: &str = "Full authentication is required to access this resource";

/// Authentication and authorization error types
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username/email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("{}", AUTHENTICATION_REQUIRED)]
    MissingToken,

    /// Token verified but its subject no longer resolves to a user
    #[error("User not found with username or email: {0}")]
    UnknownPrincipal(String),

    #[error("Username is already taken")]
    UsernameTaken,

    #[error("Email is already taken")]
    EmailTaken,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidCredentials
            | AuthError::Token(_)
            | AuthError::MissingToken
            | AuthError::UnknownPrincipal(_) => ApiError::Unauthorized(error.to_string()),
            AuthError::UsernameTaken | AuthError::EmailTaken => ApiError::DuplicateResource {
                message: error.to_string(),
            },
            AuthError::PasswordHash(_) | AuthError::InvalidRole(_) | AuthError::Config(_) => {
                ApiError::InternalError(error.to_string())
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
