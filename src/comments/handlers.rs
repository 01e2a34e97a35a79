// HTTP handlers for comment endpoints, all scoped under a post

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::middleware::AuthenticatedUser;
use crate::comments::models::{CommentRequest, CommentResponse};
use crate::error::ApiError;
use crate::AppState;

pub const COMMENT_DELETED: &str = "Comment entity deleted successfully.";

/// Add a comment to a post
/// POST /api/v1/posts/{post_id}/comments
#[utoipa::path(
    post,
    path = "/api/v1/posts/{post_id}/comments",
    params(("post_id" = i64, Path, description = "Post ID")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Post not found")
    ),
    security(("bearerAuth" = [])),
    tag = "comments"
)]
pub async fn create_comment_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(post_id): Path<i64>,
    Json(request): Json<CommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let comment = state
        .comment_service
        .create_comment(&user, post_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// List a post's comments
/// GET /api/v1/posts/{post_id}/comments
#[utoipa::path(
    get,
    path = "/api/v1/posts/{post_id}/comments",
    params(("post_id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Comments of the post", body = [CommentResponse]),
        (status = 404, description = "Post not found")
    ),
    tag = "comments"
)]
pub async fn list_comments_handler(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let comments = state.comment_service.list_comments(post_id).await?;
    Ok(Json(comments))
}

/// Get one comment of a post
/// GET /api/v1/posts/{post_id}/comments/{id}
#[utoipa::path(
    get,
    path = "/api/v1/posts/{post_id}/comments/{id}",
    params(
        ("post_id" = i64, Path, description = "Post ID"),
        ("id" = i64, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Comment found", body = CommentResponse),
        (status = 400, description = "Comment does not belong to the post"),
        (status = 404, description = "Post or comment not found")
    ),
    tag = "comments"
)]
pub async fn get_comment_handler(
    State(state): State<AppState>,
    Path((post_id, comment_id)): Path<(i64, i64)>,
) -> Result<Json<CommentResponse>, ApiError> {
    let comment = state.comment_service.get_comment(post_id, comment_id).await?;
    Ok(Json(comment))
}

/// Replace a comment
/// PUT /api/v1/posts/{post_id}/comments/{id}
#[utoipa::path(
    put,
    path = "/api/v1/posts/{post_id}/comments/{id}",
    params(
        ("post_id" = i64, Path, description = "Post ID"),
        ("id" = i64, Path, description = "Comment ID")
    ),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = CommentResponse),
        (status = 400, description = "Invalid input or comment not in post"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Post or comment not found")
    ),
    security(("bearerAuth" = [])),
    tag = "comments"
)]
pub async fn update_comment_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((post_id, comment_id)): Path<(i64, i64)>,
    Json(request): Json<CommentRequest>,
) -> Result<Json<CommentResponse>, ApiError> {
    let comment = state
        .comment_service
        .update_comment(&user, post_id, comment_id, request)
        .await?;
    Ok(Json(comment))
}

/// Delete a comment
/// DELETE /api/v1/posts/{post_id}/comments/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{post_id}/comments/{id}",
    params(
        ("post_id" = i64, Path, description = "Post ID"),
        ("id" = i64, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Comment deleted", body = String),
        (status = 400, description = "Comment does not belong to the post"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Post or comment not found")
    ),
    security(("bearerAuth" = [])),
    tag = "comments"
)]
pub async fn delete_comment_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((post_id, comment_id)): Path<(i64, i64)>,
) -> Result<(StatusCode, &'static str), ApiError> {
    state
        .comment_service
        .delete_comment(&user, post_id, comment_id)
        .await?;
    Ok((StatusCode::OK, COMMENT_DELETED))
}
