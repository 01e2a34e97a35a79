use std::collections::HashMap;
use std::sync::Arc;

use validator::Validate;

use crate::auth::{
    guard::{require_any_role, require_owner_or_admin, CONTENT_ROLES},
    middleware::AuthenticatedUser,
};
use crate::comments::{models::CommentResponse, repository::CommentRepository};
use crate::error::ApiError;
use crate::posts::{
    models::{Post, PostPage, PostRequest, PostResponse, SummaryResponse},
    repository::PostRepository,
};
use crate::query::{contains_pattern, PageMeta, PageParams, QueryValidator};
use crate::summarizer::Summarizer;

/// Service layer for post business logic
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    comment_repo: CommentRepository,
    summarizer: Arc<dyn Summarizer>,
}

impl PostService {
    /// Create a new PostService
    pub fn new(
        post_repo: PostRepository,
        comment_repo: CommentRepository,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            post_repo,
            comment_repo,
            summarizer,
        }
    }

    /// Create a post owned by the caller
    pub async fn create_post(
        &self,
        user: &AuthenticatedUser,
        request: PostRequest,
    ) -> Result<PostResponse, ApiError> {
        require_any_role(user, CONTENT_ROLES)?;
        request.validate()?;

        let post = self
            .post_repo
            .create(user.user_id, &request.title, &request.description, &request.content)
            .await?;

        tracing::info!("Post {} created by user_id={}", post.id, user.user_id);
        Ok(PostResponse::from_post(post, Vec::new()))
    }

    /// Paged, sorted listing of all posts with their comments
    pub async fn list_posts(&self, params: PageParams) -> Result<PostPage, ApiError> {
        let request = QueryValidator::validate(params)?;

        let total = self.post_repo.count().await?;
        let posts = self.post_repo.find_page(&request).await?;
        let content = self.with_comments(posts).await?;

        Ok(PostPage::new(content, PageMeta::new(&request, total)))
    }

    /// Single post with its comments
    pub async fn get_post(&self, id: i64) -> Result<PostResponse, ApiError> {
        let post = self.load(id).await?;
        let comments = self.comment_repo.find_by_post(post.id).await?;
        Ok(PostResponse::from_post(
            post,
            comments.into_iter().map(CommentResponse::from).collect(),
        ))
    }

    /// Replace a post's fields; owner or admin only
    pub async fn update_post(
        &self,
        user: &AuthenticatedUser,
        id: i64,
        request: PostRequest,
    ) -> Result<PostResponse, ApiError> {
        require_any_role(user, CONTENT_ROLES)?;
        request.validate()?;

        let existing = self.load(id).await?;
        require_owner_or_admin(user, existing.user_id, "update", "post")?;

        let post = self
            .post_repo
            .update(id, &request.title, &request.description, &request.content)
            .await?;
        let comments = self.comment_repo.find_by_post(post.id).await?;

        tracing::info!("Post {} updated by user_id={}", post.id, user.user_id);
        Ok(PostResponse::from_post(
            post,
            comments.into_iter().map(CommentResponse::from).collect(),
        ))
    }

    /// Delete a post and its comments; owner or admin only
    pub async fn delete_post(&self, user: &AuthenticatedUser, id: i64) -> Result<(), ApiError> {
        require_any_role(user, CONTENT_ROLES)?;

        let existing = self.load(id).await?;
        require_owner_or_admin(user, existing.user_id, "delete", "post")?;

        if !self.post_repo.delete(id).await? {
            return Err(ApiError::not_found("Post", id));
        }

        tracing::info!("Post {} deleted by user_id={}", id, user.user_id);
        Ok(())
    }

    /// Posts whose title or description contains `query`, ignoring case
    pub async fn search_posts(&self, query: &str) -> Result<Vec<PostResponse>, ApiError> {
        let term = QueryValidator::search_term(query)?;
        let posts = self.post_repo.search(&contains_pattern(&term)).await?;
        self.with_comments(posts).await
    }

    /// Summarize a post's content through the configured summarizer
    pub async fn summarize_post(
        &self,
        user: &AuthenticatedUser,
        id: i64,
    ) -> Result<SummaryResponse, ApiError> {
        require_any_role(user, CONTENT_ROLES)?;

        let post = self.load(id).await?;
        let summary = self.summarizer.summarize(&post.content).await?;

        tracing::debug!("Post {} summarized for user_id={}", id, user.user_id);
        Ok(SummaryResponse {
            post_id: post.id,
            summary,
        })
    }

    async fn load(&self, id: i64) -> Result<Post, ApiError> {
        self.post_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Post", id))
    }

    /// Attach comments to each post, fetched in a single query
    async fn with_comments(&self, posts: Vec<Post>) -> Result<Vec<PostResponse>, ApiError> {
        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        let mut by_post: HashMap<i64, Vec<CommentResponse>> = HashMap::new();
        for comment in self.comment_repo.find_by_posts(&ids).await? {
            by_post
                .entry(comment.post_id)
                .or_default()
                .push(CommentResponse::from(comment));
        }

        Ok(posts
            .into_iter()
            .map(|post| {
                let comments = by_post.remove(&post.id).unwrap_or_default();
                PostResponse::from_post(post, comments)
            })
            .collect())
    }
}
