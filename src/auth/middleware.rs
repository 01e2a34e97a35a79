// Authentication filter and principal extractor for protected routes

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::auth::{
    directory::UserDirectory, error::AuthError, models::Role, token::TokenProvider,
};
use crate::error::ApiError;

/// The authenticated principal for the current request
///
/// Inserted into request extensions by [`authenticate`]; handlers that need a
/// caller take it as an extractor and get a 401 when it is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub roles: Vec<Role>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AuthError::MissingToken.into())
    }
}

/// Dependencies of the authentication filter
#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<TokenProvider>,
    pub directory: Arc<dyn UserDirectory>,
}

/// Extract the token from `Authorization: Bearer <token>`
///
/// A missing header, another scheme or an empty value all count as "no token".
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authentication filter
///
/// - no token: the request continues unauthenticated
/// - invalid or expired token: rejected with 401
/// - valid token whose subject is unknown: rejected with 401
/// - valid token: the principal is attached to the request
pub async fn authenticate(
    State(auth): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let endpoint = request.uri().path().to_string();

    let Some(token) = bearer_token(request.headers()) else {
        debug!("No bearer token on request to {}", endpoint);
        return Ok(next.run(request).await);
    };

    let claims = auth.tokens.validate_now(token).map_err(|e| {
        warn!("Rejected bearer token for {}: {}", endpoint, e);
        AuthError::from(e)
    })?;

    let principal = auth
        .directory
        .load_principal(&claims.sub)
        .await?
        .ok_or_else(|| {
            warn!("Token subject '{}' no longer resolves to a user", claims.sub);
            AuthError::UnknownPrincipal(claims.sub.clone())
        })?;

    debug!(
        "Authenticated user_id={}, roles={:?}, endpoint={}",
        principal.user_id, principal.roles, endpoint
    );
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}
