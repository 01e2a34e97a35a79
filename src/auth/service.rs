// Authentication service - business logic layer

use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::auth::{
    error::AuthError,
    models::{JwtAuthResponse, LoginRequest, Role, SignupRequest, UserResponse},
    password::PasswordService,
    repository::{NewUser, UserRepository},
    token::TokenProvider,
};
use crate::error::ApiError;

/// Authentication service coordinating signup and login
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    token_provider: Arc<TokenProvider>,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(user_repo: UserRepository, token_provider: Arc<TokenProvider>) -> Self {
        Self {
            user_repo,
            token_provider,
        }
    }

    /// Register a new user with the default ROLE_USER
    ///
    /// Username and email must both be unused.
    pub async fn signup(&self, request: SignupRequest) -> Result<UserResponse, ApiError> {
        request.validate()?;
        tracing::info!("Creating a new user: {}", request.username);

        if self.user_repo.exists_by_username(&request.username).await? {
            return Err(AuthError::UsernameTaken.into());
        }
        if self.user_repo.exists_by_email(&request.email).await? {
            return Err(AuthError::EmailTaken.into());
        }

        let password_hash = PasswordService::hash_password(&request.password)?;
        let user = self
            .user_repo
            .create_with_role(
                NewUser {
                    name: request.name.trim(),
                    username: &request.username,
                    email: &request.email,
                    password_hash: &password_hash,
                },
                Role::User,
            )
            .await?;

        tracing::info!("User registered successfully with id: {}", user.id);
        Ok(UserResponse::from_user(user, vec![Role::User]))
    }

    /// Authenticate by username or email and issue a bearer token
    ///
    /// The token subject is always the canonical username.
    pub async fn login(&self, request: LoginRequest) -> Result<JwtAuthResponse, ApiError> {
        request.validate()?;

        let user = match self
            .user_repo
            .find_by_username_or_email(request.username_or_email.trim())
            .await?
        {
            Some(user) => user,
            None => {
                PasswordService::verify_against_dummy(&request.password);
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !PasswordService::verify_password(&request.password, &user.password_hash)? {
            tracing::warn!("Failed login for user_id={}", user.id);
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self.token_provider.issue(&user.username, Utc::now())?;
        tracing::debug!("Issued token for user_id={}", user.id);
        Ok(JwtAuthResponse::bearer(token))
    }

    /// Profile of an already-authenticated user
    pub async fn current_user(&self, user_id: i64) -> Result<UserResponse, ApiError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User", user_id))?;
        let roles = self.user_repo.roles_for(user.id).await?;
        Ok(UserResponse::from_user(user, roles))
    }
}
