use sqlx::PgPool;

use crate::error::{is_unique_violation, ApiError};
use crate::posts::models::Post;
use crate::query::PageRequest;

const POST_COLUMNS: &str = "id, title, description, content, user_id, created_at, updated_at";

/// Repository for database operations on posts
#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Create a new PostRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new post owned by `user_id`
    pub async fn create(
        &self,
        user_id: i64,
        title: &str,
        description: &str,
        content: &str,
    ) -> Result<Post, ApiError> {
        sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts (title, description, content, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            POST_COLUMNS
        ))
        .bind(title)
        .bind(description)
        .bind(content)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::map_title_conflict(e, title))
    }

    /// Find a post by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Post>, ApiError> {
        let post = sqlx::query_as::<_, Post>(&format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    /// Whether a post exists
    pub async fn exists(&self, id: i64) -> Result<bool, ApiError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Total number of posts
    pub async fn count(&self) -> Result<i64, ApiError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    /// One page of posts in the requested order
    pub async fn find_page(&self, request: &PageRequest) -> Result<Vec<Post>, ApiError> {
        let sql = format!(
            "SELECT {} FROM posts ORDER BY {} LIMIT $1 OFFSET $2",
            POST_COLUMNS,
            request.order_clause()
        );

        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(request.size)
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    /// Posts whose title or description matches an ILIKE pattern
    pub async fn search(&self, pattern: &str) -> Result<Vec<Post>, ApiError> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {} FROM posts WHERE title ILIKE $1 OR description ILIKE $1 ORDER BY id ASC",
            POST_COLUMNS
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    /// Replace title, description and content
    pub async fn update(
        &self,
        id: i64,
        title: &str,
        description: &str,
        content: &str,
    ) -> Result<Post, ApiError> {
        sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts
            SET title = $1, description = $2, content = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING {}
            "#,
            POST_COLUMNS
        ))
        .bind(title)
        .bind(description)
        .bind(content)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::map_title_conflict(e, title))?
        .ok_or_else(|| ApiError::not_found("Post", id))
    }

    /// Delete a post and, through the foreign key, its comments
    pub async fn delete(&self, id: i64) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    fn map_title_conflict(error: sqlx::Error, title: &str) -> ApiError {
        if is_unique_violation(&error) {
            ApiError::DuplicateResource {
                message: format!("Post with title '{}' already exists", title),
            }
        } else {
            ApiError::DatabaseError(error)
        }
    }
}
