// User directory lookup used by the authentication filter

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::auth::{middleware::AuthenticatedUser, models::Role};
use crate::error::ApiError;

/// Resolves a token subject to the user it names, with that user's roles
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up a principal by username or email; `None` when no user matches
    async fn load_principal(
        &self,
        username_or_email: &str,
    ) -> Result<Option<AuthenticatedUser>, ApiError>;
}

/// Directory backed by a map, for tests and local tooling
#[derive(Default)]
pub struct InMemoryDirectory {
    users: RwLock<HashMap<String, AuthenticatedUser>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user, returning the stored principal
    pub fn insert(&self, user_id: i64, username: &str, roles: &[Role]) -> AuthenticatedUser {
        let principal = AuthenticatedUser {
            user_id,
            username: username.to_string(),
            email: format!("{}@example.com", username),
            roles: roles.to_vec(),
        };
        if let Ok(mut users) = self.users.write() {
            users.insert(username.to_string(), principal.clone());
        }
        principal
    }

    pub fn remove(&self, username: &str) {
        if let Ok(mut users) = self.users.write() {
            users.remove(username);
        }
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn load_principal(
        &self,
        username_or_email: &str,
    ) -> Result<Option<AuthenticatedUser>, ApiError> {
        let users = self
            .users
            .read()
            .map_err(|_| ApiError::InternalError("user directory lock poisoned".to_string()))?;

        Ok(users.get(username_or_email).cloned().or_else(|| {
            users
                .values()
                .find(|user| user.email.eq_ignore_ascii_case(username_or_email))
                .cloned()
        }))
    }
}
