// Admin user directory and export

use axum::{
    extract::{Query, State},
    response::Response,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::auth::{AdminUser, AuthError, UserResponse, UserWithRole};
use crate::error::ApiError;
use crate::export::{csv_attachment, export_filename, format_timestamp, or_placeholder, to_csv};
use crate::AppState;

pub const USER_EXPORT_HEADERS: [&str; 4] = ["Email", "Full Name", "Role", "Joined Date"];

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct UserListQuery {
    /// Matches email, full name or role
    pub search: Option<String>,
}

pub fn user_export_row(user: &UserWithRole) -> Vec<String> {
    vec![
        user.email.clone(),
        or_placeholder(user.full_name.as_deref(), "N/A"),
        user.role.to_string(),
        format_timestamp(user.created_at),
    ]
}

/// Registered users with their roles, newest first
#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(UserListQuery),
    responses(
        (status = 200, description = "Users", body = Vec<UserResponse>),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Vec<UserResponse>>, AuthError> {
    let users = state
        .user_repo
        .list_with_roles(query.search.as_deref())
        .await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/export.csv",
    responses((status = 200, description = "CSV of all users", content_type = "text/csv")),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn export_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Response, ApiError> {
    let users = state
        .user_repo
        .list_with_roles(None)
        .await
        .map_err(|e| ApiError::InternalError(e.to_string()))?;
    let body = to_csv(&USER_EXPORT_HEADERS, users.iter().map(user_export_row))?;
    Ok(csv_attachment(&export_filename("users", Utc::now()), body))
}
