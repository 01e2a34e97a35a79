pub mod auth;
pub mod comments;
pub mod config;
pub mod db;
pub mod error;
pub mod posts;
pub mod query;
pub mod summarizer;
pub mod validation;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use sqlx::PgPool;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use auth::{authenticate, AuthService, AuthState, TokenProvider, UserRepository};
use comments::{CommentRepository, CommentService};
use posts::{PostRepository, PostService};
use summarizer::Summarizer;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::login_handler,
        auth::handlers::signup_handler,
        auth::handlers::me_handler,
        posts::handlers::create_post_handler,
        posts::handlers::list_posts_handler,
        posts::handlers::get_post_handler,
        posts::handlers::update_post_handler,
        posts::handlers::delete_post_handler,
        posts::handlers::search_posts_handler,
        posts::handlers::summarize_post_handler,
        comments::handlers::create_comment_handler,
        comments::handlers::list_comments_handler,
        comments::handlers::get_comment_handler,
        comments::handlers::update_comment_handler,
        comments::handlers::delete_comment_handler,
    ),
    components(
        schemas(
            auth::models::Role,
            auth::models::LoginRequest,
            auth::models::SignupRequest,
            auth::models::JwtAuthResponse,
            auth::models::UserResponse,
            posts::models::PostRequest,
            posts::models::PostResponse,
            posts::models::PostPage,
            posts::models::SummaryResponse,
            comments::models::CommentRequest,
            comments::models::CommentResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Signup and login"),
        (name = "posts", description = "Post APIs"),
        (name = "comments", description = "Comment APIs")
    ),
    info(
        title = "Blog REST API",
        version = "1.0.0",
        description = "Blog posts and comments with JWT authentication"
    )
)]
pub struct ApiDoc;

/// Registers the `bearerAuth` scheme referenced by protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub auth: AuthState,
    pub auth_service: AuthService,
    pub post_service: PostService,
    pub comment_service: CommentService,
}

impl AppState {
    /// Wire repositories and services over one pool
    pub fn new(db: PgPool, tokens: Arc<TokenProvider>, summarizer: Arc<dyn Summarizer>) -> Self {
        let user_repo = UserRepository::new(db.clone());
        let post_repo = PostRepository::new(db.clone());
        let comment_repo = CommentRepository::new(db.clone());

        Self {
            auth: AuthState {
                tokens: tokens.clone(),
                directory: Arc::new(user_repo.clone()),
            },
            auth_service: AuthService::new(user_repo, tokens),
            post_service: PostService::new(post_repo.clone(), comment_repo.clone(), summarizer),
            comment_service: CommentService::new(comment_repo, post_repo),
            db,
        }
    }
}

/// Versioned API routes
fn api_routes() -> Router<AppState> {
    use axum::routing::post;

    Router::new()
        .route("/auth/login", post(auth::handlers::login_handler))
        .route("/auth/signup", post(auth::handlers::signup_handler))
        .route("/auth/me", get(auth::handlers::me_handler))
        .route(
            "/posts",
            get(posts::handlers::list_posts_handler).post(posts::handlers::create_post_handler),
        )
        .route("/posts/search", get(posts::handlers::search_posts_handler))
        .route(
            "/posts/summarize/:id",
            get(posts::handlers::summarize_post_handler),
        )
        .route(
            "/posts/:id",
            get(posts::handlers::get_post_handler)
                .put(posts::handlers::update_post_handler)
                .delete(posts::handlers::delete_post_handler),
        )
        .route(
            "/posts/:post_id/comments",
            get(comments::handlers::list_comments_handler)
                .post(comments::handlers::create_comment_handler),
        )
        .route(
            "/posts/:post_id/comments/:id",
            get(comments::handlers::get_comment_handler)
                .put(comments::handlers::update_comment_handler)
                .delete(comments::handlers::delete_comment_handler),
        )
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "UP" }))
}

/// Build the CORS layer; an empty allowlist accepts any origin
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

/// Assemble the full application router
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health))
        .nest("/api/v1", api_routes())
        .layer(from_fn_with_state(state.auth.clone(), authenticate))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

#[cfg(test)]
mod tests;
