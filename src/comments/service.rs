use validator::Validate;

use crate::auth::{
    guard::{require_any_role, require_owner_or_admin, CONTENT_ROLES},
    middleware::AuthenticatedUser,
};
use crate::comments::{
    models::{Comment, CommentRequest, CommentResponse},
    repository::CommentRepository,
};
use crate::error::ApiError;
use crate::posts::repository::PostRepository;

pub const COMMENT_NOT_IN_POST: &str = "Comment does not belong to the post";

/// Service layer for comment business logic
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
}

impl CommentService {
    /// Create a new CommentService
    pub fn new(comment_repo: CommentRepository, post_repo: PostRepository) -> Self {
        Self {
            comment_repo,
            post_repo,
        }
    }

    /// Add a comment to an existing post
    pub async fn create_comment(
        &self,
        user: &AuthenticatedUser,
        post_id: i64,
        request: CommentRequest,
    ) -> Result<CommentResponse, ApiError> {
        require_any_role(user, CONTENT_ROLES)?;
        request.validate()?;
        self.ensure_post(post_id).await?;

        let comment = self
            .comment_repo
            .create(post_id, user.user_id, request.name.trim(), &request.email, &request.body)
            .await?;

        tracing::info!(
            "Comment {} added to post {} by user_id={}",
            comment.id,
            post_id,
            user.user_id
        );
        Ok(comment.into())
    }

    /// All comments of a post
    pub async fn list_comments(&self, post_id: i64) -> Result<Vec<CommentResponse>, ApiError> {
        self.ensure_post(post_id).await?;
        let comments = self.comment_repo.find_by_post(post_id).await?;
        Ok(comments.into_iter().map(CommentResponse::from).collect())
    }

    /// One comment, which must belong to `post_id`
    pub async fn get_comment(&self, post_id: i64, comment_id: i64) -> Result<CommentResponse, ApiError> {
        let comment = self.load_in_post(post_id, comment_id).await?;
        Ok(comment.into())
    }

    /// Replace a comment; owner or admin only
    pub async fn update_comment(
        &self,
        user: &AuthenticatedUser,
        post_id: i64,
        comment_id: i64,
        request: CommentRequest,
    ) -> Result<CommentResponse, ApiError> {
        require_any_role(user, CONTENT_ROLES)?;
        request.validate()?;

        let existing = self.load_in_post(post_id, comment_id).await?;
        require_owner_or_admin(user, existing.user_id, "update", "comment")?;

        let comment = self
            .comment_repo
            .update(comment_id, request.name.trim(), &request.email, &request.body)
            .await?;
        Ok(comment.into())
    }

    /// Delete a comment; owner or admin only
    pub async fn delete_comment(
        &self,
        user: &AuthenticatedUser,
        post_id: i64,
        comment_id: i64,
    ) -> Result<(), ApiError> {
        require_any_role(user, CONTENT_ROLES)?;

        let existing = self.load_in_post(post_id, comment_id).await?;
        require_owner_or_admin(user, existing.user_id, "delete", "comment")?;

        if !self.comment_repo.delete(comment_id).await? {
            return Err(ApiError::not_found("Comment", comment_id));
        }

        tracing::info!("Comment {} deleted by user_id={}", comment_id, user.user_id);
        Ok(())
    }

    async fn ensure_post(&self, post_id: i64) -> Result<(), ApiError> {
        if self.post_repo.exists(post_id).await? {
            Ok(())
        } else {
            Err(ApiError::not_found("Post", post_id))
        }
    }

    async fn load_in_post(&self, post_id: i64, comment_id: i64) -> Result<Comment, ApiError> {
        self.ensure_post(post_id).await?;

        let comment = self
            .comment_repo
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Comment", comment_id))?;

        check_parent(&comment, post_id)?;
        Ok(comment)
    }
}

/// A comment addressed through the wrong post is a client error, not a 404
fn check_parent(comment: &Comment, post_id: i64) -> Result<(), ApiError> {
    if comment.post_id == post_id {
        Ok(())
    } else {
        Err(ApiError::BadRequest(COMMENT_NOT_IN_POST.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::Utc;

    fn comment_in(post_id: i64) -> Comment {
        Comment {
            id: 1,
            name: "Bob".into(),
            email: "bob@example.com".into(),
            body: "A thoughtful comment".into(),
            post_id,
            user_id: Some(2),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_parent_matches() {
        assert!(check_parent(&comment_in(5), 5).is_ok());
    }

    #[test]
    fn test_parent_mismatch_is_bad_request() {
        let err = check_parent(&comment_in(5), 6).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        match err {
            ApiError::BadRequest(message) => assert_eq!(message, COMMENT_NOT_IN_POST),
            other => panic!("Expected BadRequest, got {:?}", other),
        }
    }
}
