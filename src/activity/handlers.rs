use axum::{
    extract::{Query, State},
    Json,
};

use crate::activity::{ActivityEntry, ActivityQuery};
use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::AppState;

/// Recent admin activity, newest first
#[utoipa::path(
    get,
    path = "/api/admin/activity",
    params(ActivityQuery),
    responses(
        (status = 200, description = "Recent activity", body = Vec<ActivityEntry>),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_activity(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<ActivityEntry>>, ApiError> {
    let entries = state
        .activity
        .recent(query.effective_limit())
        .await?
        .into_iter()
        .map(ActivityEntry::from)
        .collect();

    Ok(Json(entries))
}
