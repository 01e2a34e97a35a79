// HTTP handlers for authentication endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::{
    middleware::AuthenticatedUser,
    models::{JwtAuthResponse, LoginRequest, SignupRequest, UserResponse},
};
use crate::error::ApiError;
use crate::AppState;

/// Login with username or email
/// POST /api/v1/auth/login
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = JwtAuthResponse),
        (status = 400, description = "Invalid input data"),
        (status = 401, description = "Invalid username/email or password")
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<JwtAuthResponse>, ApiError> {
    let response = state.auth_service.login(request).await?;
    Ok(Json(response))
}

/// Register a new account
/// POST /api/v1/auth/signup
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid input, or username/email already taken")
    ),
    tag = "auth"
)]
pub async fn signup_handler(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state.auth_service.signup(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Current user information
/// GET /api/v1/auth/me
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearerAuth" = [])),
    tag = "auth"
)]
pub async fn me_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserResponse>, ApiError> {
    let response = state.auth_service.current_user(user.user_id).await?;
    Ok(Json(response))
}
