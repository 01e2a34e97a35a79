use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::comments::models::CommentResponse;
use crate::query::PageMeta;

/// Post row as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub content: String,
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or replacing a post
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PostRequest {
    #[validate(length(min = 2, max = 255, message = "Post title must be between 2 and 255 characters"))]
    pub title: String,
    #[validate(length(min = 10, message = "Post description should have at least 10 characters"))]
    pub description: String,
    #[validate(custom = "crate::validation::validate_not_blank")]
    pub content: String,
}

/// Post with its comments
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub content: String,
    pub user_id: Option<i64>,
    pub comments: Vec<CommentResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostResponse {
    pub fn from_post(post: Post, comments: Vec<CommentResponse>) -> Self {
        Self {
            id: post.id,
            title: post.title,
            description: post.description,
            content: post.content,
            user_id: post.user_id,
            comments,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// One page of posts
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostPage {
    pub content: Vec<PostResponse>,
    pub page: i64,
    pub size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
    pub last: bool,
}

impl PostPage {
    pub fn new(content: Vec<PostResponse>, meta: PageMeta) -> Self {
        Self {
            content,
            page: meta.page,
            size: meta.size,
            total_elements: meta.total_elements,
            total_pages: meta.total_pages,
            last: meta.last,
        }
    }
}

/// Query string for GET /api/v1/posts/search
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Text matched against title and description, case-insensitively
    pub query: String,
}

/// Result of summarizing a post
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SummaryResponse {
    pub post_id: i64,
    pub summary: String,
}
