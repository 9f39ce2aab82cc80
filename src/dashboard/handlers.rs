use axum::{extract::State, Json};
use chrono::Utc;

use crate::auth::{AdminUser, AuthenticatedUser};
use crate::dashboard::{admin_dashboard, user_dashboard, AdminDashboard, UserDashboard};
use crate::error::ApiError;
use crate::AppState;

/// Statistics for the caller's own submissions and messages
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses((status = 200, description = "User dashboard", body = UserDashboard)),
    security(("bearer_auth" = [])),
    tag = "dashboard"
)]
pub async fn get_user_dashboard(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserDashboard>, ApiError> {
    let submissions = state.dashboard.user_submissions(user.user_id).await?;
    let messages = state.dashboard.message_statuses(Some(user.user_id)).await?;

    Ok(Json(user_dashboard(
        &submissions,
        &messages,
        Utc::now().date_naive(),
    )))
}

/// Portal-wide statistics
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Admin dashboard", body = AdminDashboard),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn get_admin_dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<AdminDashboard>, ApiError> {
    let (submissions, messages, users) = tokio::try_join!(
        state.dashboard.all_submissions(),
        state.dashboard.message_statuses(None),
        state.dashboard.user_count(),
    )?;

    Ok(Json(admin_dashboard(&submissions, &messages, users)))
}
