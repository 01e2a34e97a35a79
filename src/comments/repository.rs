use sqlx::PgPool;

use crate::comments::models::Comment;
use crate::error::{is_foreign_key_violation, ApiError};

const COMMENT_COLUMNS: &str = "id, name, email, body, post_id, user_id, created_at, updated_at";

fn violated_constraint(error: &sqlx::Error) -> &str {
    match error {
        sqlx::Error::Database(db_err) => db_err.constraint().unwrap_or_default(),
        _ => "",
    }
}

/// Repository for database operations on comments
#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    /// Create a new CommentRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new comment under a post
    pub async fn create(
        &self,
        post_id: i64,
        user_id: i64,
        name: &str,
        email: &str,
        body: &str,
    ) -> Result<Comment, ApiError> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            r#"
            INSERT INTO comments (name, email, body, post_id, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            COMMENT_COLUMNS
        ))
        .bind(name)
        .bind(email)
        .bind(body)
        .bind(post_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // The post was deleted between the parent check and the insert
            if is_foreign_key_violation(&e) && violated_constraint(&e).contains("post_id") {
                ApiError::not_found("Post", post_id)
            } else {
                ApiError::from(e)
            }
        })?;

        Ok(comment)
    }

    /// Find a comment by ID regardless of its post
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, ApiError> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {} FROM comments WHERE id = $1",
            COMMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    /// All comments of one post, oldest first
    pub async fn find_by_post(&self, post_id: i64) -> Result<Vec<Comment>, ApiError> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {} FROM comments WHERE post_id = $1 ORDER BY id ASC",
            COMMENT_COLUMNS
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    /// Comments of several posts in one round-trip
    pub async fn find_by_posts(&self, post_ids: &[i64]) -> Result<Vec<Comment>, ApiError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let comments = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {} FROM comments WHERE post_id = ANY($1) ORDER BY post_id ASC, id ASC",
            COMMENT_COLUMNS
        ))
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    /// Replace name, email and body
    pub async fn update(&self, id: i64, name: &str, email: &str, body: &str) -> Result<Comment, ApiError> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            r#"
            UPDATE comments
            SET name = $1, email = $2, body = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING {}
            "#,
            COMMENT_COLUMNS
        ))
        .bind(name)
        .bind(email)
        .bind(body)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment", id))?;

        Ok(comment)
    }

    /// Delete a comment; returns false when nothing was deleted
    pub async fn delete(&self, id: i64) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
