// HTTP handlers for post endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::auth::middleware::AuthenticatedUser;
use crate::error::ApiError;
use crate::posts::models::{PostPage, PostRequest, PostResponse, SearchParams, SummaryResponse};
use crate::query::PageParams;
use crate::AppState;

pub const POST_DELETED: &str = "Post entity deleted successfully.";

/// Create a new post
/// POST /api/v1/posts
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = PostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Invalid input or duplicate title"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Insufficient role")
    ),
    security(("bearerAuth" = [])),
    tag = "posts"
)]
pub async fn create_post_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<PostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let post = state.post_service.create_post(&user, request).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// List posts with paging and sorting
/// GET /api/v1/posts
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    params(PageParams),
    responses(
        (status = 200, description = "One page of posts", body = PostPage),
        (status = 400, description = "Invalid paging parameters")
    ),
    tag = "posts"
)]
pub async fn list_posts_handler(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<PostPage>, ApiError> {
    let page = state.post_service.list_posts(params).await?;
    Ok(Json(page))
}

/// Get a post by ID
/// GET /api/v1/posts/{id}
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post found", body = PostResponse),
        (status = 404, description = "Post not found")
    ),
    tag = "posts"
)]
pub async fn get_post_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state.post_service.get_post(id).await?;
    Ok(Json(post))
}

/// Replace a post
/// PUT /api/v1/posts/{id}
#[utoipa::path(
    put,
    path = "/api/v1/posts/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    request_body = PostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 400, description = "Invalid input or duplicate title"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Post not found")
    ),
    security(("bearerAuth" = [])),
    tag = "posts"
)]
pub async fn update_post_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(request): Json<PostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state.post_service.update_post(&user, id, request).await?;
    Ok(Json(post))
}

/// Delete a post and its comments
/// DELETE /api/v1/posts/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post deleted", body = String),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Post not found")
    ),
    security(("bearerAuth" = [])),
    tag = "posts"
)]
pub async fn delete_post_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<(StatusCode, &'static str), ApiError> {
    state.post_service.delete_post(&user, id).await?;
    Ok((StatusCode::OK, POST_DELETED))
}

/// Search posts by title or description
/// GET /api/v1/posts/search?query=
#[utoipa::path(
    get,
    path = "/api/v1/posts/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching posts", body = [PostResponse]),
        (status = 400, description = "Blank query")
    ),
    tag = "posts"
)]
pub async fn search_posts_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = state.post_service.search_posts(&params.query).await?;
    Ok(Json(posts))
}

/// Summarize a post's content
/// GET /api/v1/posts/summarize/{id}
#[utoipa::path(
    get,
    path = "/api/v1/posts/summarize/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Summary generated", body = SummaryResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Post not found"),
        (status = 502, description = "Summarizer failed"),
        (status = 503, description = "Summarizer not configured")
    ),
    security(("bearerAuth" = [])),
    tag = "posts"
)]
pub async fn summarize_post_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let summary = state.post_service.summarize_post(&user, id).await?;
    Ok(Json(summary))
}
