use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{AdminUser, AuthenticatedUser};
use crate::error::ApiError;
use crate::export::{csv_attachment, export_filename};
use crate::support::{AdminMessageQuery, CreateMessageRequest, RespondMessageRequest, SupportMessage};
use crate::AppState;

/// Open a support thread
#[utoipa::path(
    post,
    path = "/api/support",
    request_body = CreateMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = SupportMessage),
        (status = 400, description = "Invalid subject or message")
    ),
    security(("bearer_auth" = [])),
    tag = "support"
)]
pub async fn create_message(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<SupportMessage>), ApiError> {
    request.validate()?;
    let message = state.support.create(user.user_id, &request).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// The caller's support messages, newest first
#[utoipa::path(
    get,
    path = "/api/support",
    responses((status = 200, description = "Own messages", body = Vec<SupportMessage>)),
    security(("bearer_auth" = [])),
    tag = "support"
)]
pub async fn list_my_messages(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<SupportMessage>>, ApiError> {
    Ok(Json(state.support.list_mine(user.user_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/messages",
    params(AdminMessageQuery),
    responses(
        (status = 200, description = "All support messages", body = Vec<SupportMessage>),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn admin_list_messages(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<AdminMessageQuery>,
) -> Result<Json<Vec<SupportMessage>>, ApiError> {
    let messages = state
        .support
        .list_all(query.search.as_deref(), query.status)
        .await?;
    Ok(Json(messages))
}

#[utoipa::path(
    patch,
    path = "/api/admin/messages/{id}",
    params(("id" = Uuid, Path, description = "Support message id")),
    request_body = RespondMessageRequest,
    responses(
        (status = 200, description = "Response saved", body = SupportMessage),
        (status = 404, description = "Message not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn respond_to_message(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<RespondMessageRequest>,
) -> Result<Json<SupportMessage>, ApiError> {
    request.validate()?;
    let message = state.support.respond(&admin, id, &request).await?;
    Ok(Json(message))
}

#[utoipa::path(
    get,
    path = "/api/admin/messages/export.csv",
    params(AdminMessageQuery),
    responses((status = 200, description = "CSV of matching support messages", content_type = "text/csv")),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn export_messages(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<AdminMessageQuery>,
) -> Result<Response, ApiError> {
    let body = state
        .support
        .export_csv(query.search.as_deref(), query.status)
        .await?;
    Ok(csv_attachment(&export_filename("support_messages", Utc::now()), body))
}
