// HTTP handlers for authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::auth::{
    error::AuthError,
    middleware::AuthenticatedUser,
    models::{AdminSetupStatus, AuthResponse, LoginRequest, RefreshRequest, RegisterRequest, UserResponse},
};
use crate::AppState;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already exists")
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::ValidationError(e.to_string()))?;

    let response = state
        .auth_service
        .register(&request.email, &request.password, request.full_name.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::ValidationError(e.to_string()))?;

    let response = state
        .auth_service
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(response))
}

/// Rotate a refresh token into a new token pair
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair", body = AuthResponse),
        (status = 401, description = "Invalid or expired refresh token")
    ),
    tag = "auth"
)]
pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = state
        .auth_service
        .refresh_tokens(&request.refresh_token)
        .await?;

    Ok(Json(response))
}

/// Revoke a refresh token
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    request_body = RefreshRequest,
    responses((status = 204, description = "Logged out")),
    tag = "auth"
)]
pub async fn logout_handler(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<StatusCode, AuthError> {
    state.auth_service.logout(&request.refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get current user information
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserResponse>, AuthError> {
    let response = state.auth_service.get_current_user(user.user_id).await?;
    Ok(Json(response))
}

/// Whether an admin exists and whether the caller is one
#[utoipa::path(
    get,
    path = "/api/admin/setup",
    responses((status = 200, description = "Admin setup state", body = AdminSetupStatus)),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn admin_setup_status_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<AdminSetupStatus>, AuthError> {
    let status = state.auth_service.setup_status(user.user_id).await?;
    Ok(Json(status))
}

/// Claim the admin role; only possible while no admin exists
#[utoipa::path(
    post,
    path = "/api/admin/setup/claim",
    responses(
        (status = 200, description = "Caller is now admin", body = AuthResponse),
        (status = 409, description = "An admin already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn claim_admin_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = state.auth_service.claim_admin(user.user_id).await?;
    Ok(Json(response))
}
