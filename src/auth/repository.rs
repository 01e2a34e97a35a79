// Database repository for users and their roles

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::auth::{
    directory::UserDirectory,
    error::AuthError,
    middleware::AuthenticatedUser,
    models::{Role, User},
};
use crate::error::{is_unique_violation, ApiError};

const USER_COLUMNS: &str = "id, name, username, email, password_hash, created_at";

/// New user fields, password already hashed
pub struct NewUser<'a> {
    pub name: &'a str,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user and assign the given role in one transaction
    pub async fn create_with_role(&self, new_user: NewUser<'_>, role: Role) -> Result<User, ApiError> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, username, email, password_hash) VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(new_user.name)
        .bind(new_user.username)
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                // The pre-checks lost a race; report it the same way they would.
                return ApiError::from(Self::classify_unique_violation(&e));
            }
            ApiError::DatabaseError(e)
        })?;

        Self::assign_role_in(&mut tx, user.id, role).await?;
        tx.commit().await?;

        Ok(user)
    }

    fn classify_unique_violation(error: &sqlx::Error) -> AuthError {
        let constraint = match error {
            sqlx::Error::Database(db_err) => db_err.constraint().unwrap_or_default().to_string(),
            _ => String::new(),
        };
        if constraint.contains("email") {
            AuthError::EmailTaken
        } else {
            AuthError::UsernameTaken
        }
    }

    async fn assign_role_in(
        tx: &mut Transaction<'_, Postgres>,
        user_id: i64,
        role: Role,
    ) -> Result<(), ApiError> {
        let result = sqlx::query(
            "INSERT INTO users_roles (user_id, role_id)
             SELECT $1, id FROM roles WHERE name = $2
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(role.as_str())
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!("Role {} already assigned to user {}", role, user_id);
        }
        Ok(())
    }

    /// Explicitly grant a role to an existing user
    pub async fn assign_role(&self, user_id: i64, role: Role) -> Result<(), ApiError> {
        let mut tx = self.pool.begin().await?;
        Self::assign_role_in(&mut tx, user_id, role).await?;
        tx.commit().await?;
        tracing::info!("Assigned role {} to user {}", role, user_id);
        Ok(())
    }

    /// Find a user by username, or by email (case-insensitive)
    pub async fn find_by_username_or_email(&self, identifier: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = $1 OR LOWER(email) = LOWER($1) LIMIT 1",
            USER_COLUMNS
        ))
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Check if a username exists
    pub async fn exists_by_username(&self, username: &str) -> Result<bool, ApiError> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists.0)
    }

    /// Check if an email exists (case-insensitive)
    pub async fn exists_by_email(&self, email: &str) -> Result<bool, ApiError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }

    /// Roles assigned to a user
    pub async fn roles_for(&self, user_id: i64) -> Result<Vec<Role>, ApiError> {
        let names: Vec<(String,)> = sqlx::query_as(
            "SELECT r.name FROM roles r
             JOIN users_roles ur ON ur.role_id = r.id
             WHERE ur.user_id = $1
             ORDER BY r.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        names
            .into_iter()
            .map(|(name,)| name.parse::<Role>().map_err(ApiError::from))
            .collect()
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn load_principal(
        &self,
        username_or_email: &str,
    ) -> Result<Option<AuthenticatedUser>, ApiError> {
        let Some(user) = self.find_by_username_or_email(username_or_email).await? else {
            return Ok(None);
        };
        let roles = self.roles_for(user.id).await?;

        Ok(Some(AuthenticatedUser {
            user_id: user.id,
            username: user.username,
            email: user.email,
            roles,
        }))
    }
}
