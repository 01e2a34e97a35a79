// Authorization guards invoked at the top of mutating operations

use crate::auth::{middleware::AuthenticatedUser, models::Role};
use crate::error::ApiError;

/// Roles allowed to create and modify content
pub const CONTENT_ROLES: &[Role] = &[Role::Admin, Role::User];

/// Require the caller to hold at least one of `roles`
pub fn require_any_role(user: &AuthenticatedUser, roles: &[Role]) -> Result<(), ApiError> {
    if roles.iter().any(|role| user.has_role(*role)) {
        return Ok(());
    }

    tracing::warn!(
        "Authorization failed: user_id={}, required one of {:?}, has {:?}",
        user.user_id,
        roles,
        user.roles
    );
    Err(ApiError::Forbidden(
        "Access Denied: insufficient role".to_string(),
    ))
}

/// Require the caller to own the resource or be an admin
///
/// `owner_id` is `None` for content whose owner was deleted; only admins may
/// touch it.
pub fn require_owner_or_admin(
    user: &AuthenticatedUser,
    owner_id: Option<i64>,
    action: &str,
    resource: &str,
) -> Result<(), ApiError> {
    if user.is_admin() || owner_id == Some(user.user_id) {
        return Ok(());
    }

    tracing::warn!(
        "Ownership check failed: user_id={} tried to {} {} owned by {:?}",
        user.user_id,
        action,
        resource,
        owner_id
    );
    Err(ApiError::Forbidden(format!(
        "You can only {} your own {}s!",
        action, resource
    )))
}
