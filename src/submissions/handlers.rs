use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::auth::{AdminUser, AuthenticatedUser};
use crate::error::ApiError;
use crate::export::{csv_attachment, export_filename};
use crate::submissions::{
    AdminSubmissionQuery, BulkActionRequest, BulkActionResponse, NewSubmission, ProofUpload,
    ReviewSubmissionRequest, Submission, SubmissionError, SubmissionListQuery,
};
use crate::AppState;

/// Form field carrying the payment proof file
pub const PROOF_FIELD: &str = "payment_proof";

/// Read the submission form; any client-sent amount is ignored
async fn read_submission_form(
    mut multipart: Multipart,
) -> Result<(NewSubmission, Option<ProofUpload>), SubmissionError> {
    let mut form = NewSubmission::default();
    let mut proof = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        SubmissionError::Multipart(e.to_string())
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == PROOF_FIELD {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let file_name = field.file_name().unwrap_or("proof").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| SubmissionError::Multipart(e.to_string()))?;

            proof = Some(ProofUpload {
                file_name,
                content_type,
                data: data.to_vec(),
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| SubmissionError::Multipart(format!("{}: {}", field_name, e)))?;
        form.set_field(&field_name, value)
            .map_err(SubmissionError::ValidationError)?;
    }

    Ok((form, proof))
}

/// Submit a posting-service application with its payment proof
#[utoipa::path(
    post,
    path = "/api/submissions",
    request_body(
        content_type = "multipart/form-data",
        description = "name, course, call_up, state_of_origin, state_of_choices, service_type, \
                       optional state_code, nysc_email and nysc_password, and the payment_proof file"
    ),
    responses(
        (status = 201, description = "Submission created", body = Submission),
        (status = 400, description = "Invalid form data or missing proof"),
        (status = 413, description = "Payment proof too large"),
        (status = 415, description = "Unsupported payment proof type")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn create_submission(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Submission>), SubmissionError> {
    let (form, proof) = read_submission_form(multipart).await?;
    let submission = state.submissions.create(user.user_id, form, proof).await?;
    Ok((StatusCode::CREATED, Json(submission.for_owner())))
}

/// The caller's submissions, newest first
#[utoipa::path(
    get,
    path = "/api/submissions",
    params(SubmissionListQuery),
    responses((status = 200, description = "Own submissions", body = Vec<Submission>)),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn list_my_submissions(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<SubmissionListQuery>,
) -> Result<Json<Vec<Submission>>, SubmissionError> {
    let submissions = state
        .submissions
        .list_mine(user.user_id, query.search.as_deref())
        .await?;
    Ok(Json(submissions))
}

#[utoipa::path(
    get,
    path = "/api/submissions/{id}",
    params(("id" = Uuid, Path, description = "Submission id")),
    responses(
        (status = 200, description = "Submission", body = Submission),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Submission not found")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn get_submission(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Submission>, SubmissionError> {
    Ok(Json(state.submissions.get(&user, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/submissions",
    params(AdminSubmissionQuery),
    responses(
        (status = 200, description = "All submissions", body = Vec<Submission>),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn admin_list_submissions(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<AdminSubmissionQuery>,
) -> Result<Json<Vec<Submission>>, SubmissionError> {
    let submissions = state
        .submissions
        .list_all(query.search.as_deref(), query.status)
        .await?;
    Ok(Json(submissions))
}

/// Update status, payment verification, remarks or notes
#[utoipa::path(
    patch,
    path = "/api/admin/submissions/{id}",
    params(("id" = Uuid, Path, description = "Submission id")),
    request_body = ReviewSubmissionRequest,
    responses(
        (status = 200, description = "Submission updated", body = Submission),
        (status = 404, description = "Submission not found"),
        (status = 409, description = "Status change not allowed")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn review_submission(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ReviewSubmissionRequest>,
) -> Result<Json<Submission>, SubmissionError> {
    Ok(Json(state.submissions.review(&admin, id, &request).await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/submissions/bulk",
    request_body = BulkActionRequest,
    responses(
        (status = 200, description = "Bulk action result", body = BulkActionResponse),
        (status = 400, description = "Empty or oversized id list")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn bulk_update_submissions(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(request): Json<BulkActionRequest>,
) -> Result<Json<BulkActionResponse>, SubmissionError> {
    Ok(Json(state.submissions.bulk(&admin, &request).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/submissions/export.csv",
    params(AdminSubmissionQuery),
    responses((status = 200, description = "CSV of matching submissions", content_type = "text/csv")),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn export_submissions(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<AdminSubmissionQuery>,
) -> Result<Response, ApiError> {
    let body = state
        .submissions
        .export_csv(query.search.as_deref(), query.status)
        .await?;
    Ok(csv_attachment(&export_filename("submissions", Utc::now()), body))
}
