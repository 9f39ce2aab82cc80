use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::like_pattern;
use crate::submissions::{
    NewSubmission, Submission, SubmissionChanges, SubmissionError, SubmissionStatus,
};

const SUBMISSION_COLUMNS: &str = "id, user_id, name, course, call_up, state_of_origin, \
     state_of_choices, state_code, service_type, calculated_amount, status, payment_verified, \
     payment_proof_url, remarks, admin_notes, nysc_email, nysc_password, created_at, updated_at";

/// Repository for submission rows
#[derive(Clone)]
pub struct SubmissionRepository {
    pool: PgPool,
}

impl SubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new submission in the pending state
    pub async fn create(
        &self,
        user_id: Uuid,
        form: &NewSubmission,
        calculated_amount: Decimal,
        payment_proof_url: &str,
    ) -> Result<Submission, SubmissionError> {
        let sql = format!(
            r#"
            INSERT INTO submissions (
                user_id, name, course, call_up, state_of_origin, state_of_choices,
                state_code, service_type, calculated_amount, status, payment_verified,
                payment_proof_url, nysc_email, nysc_password
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, FALSE, $11, $12, $13)
            RETURNING {}
            "#,
            SUBMISSION_COLUMNS
        );

        let submission = sqlx::query_as::<_, Submission>(&sql)
            .bind(user_id)
            .bind(&form.name)
            .bind(&form.course)
            .bind(&form.call_up)
            .bind(&form.state_of_origin)
            .bind(&form.state_of_choices)
            .bind(&form.state_code)
            .bind(form.service_type)
            .bind(calculated_amount)
            .bind(SubmissionStatus::Pending)
            .bind(payment_proof_url)
            .bind(&form.nysc_email)
            .bind(&form.nysc_password)
            .fetch_one(&self.pool)
            .await?;

        Ok(submission)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Submission>, SubmissionError> {
        let sql = format!("SELECT {} FROM submissions WHERE id = $1", SUBMISSION_COLUMNS);
        let submission = sqlx::query_as::<_, Submission>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(submission)
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Submission>, SubmissionError> {
        let sql = format!(
            "SELECT {} FROM submissions WHERE id = ANY($1)",
            SUBMISSION_COLUMNS
        );
        let submissions = sqlx::query_as::<_, Submission>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(submissions)
    }

    /// A user's submissions, newest first
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<Submission>, SubmissionError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM submissions
            WHERE user_id = $1
              AND ($2::text IS NULL
                   OR LOWER(name) LIKE $2
                   OR LOWER(course) LIKE $2
                   OR LOWER(call_up) LIKE $2
                   OR LOWER(state_of_origin) LIKE $2
                   OR LOWER(state_of_choices) LIKE $2
                   OR LOWER(status) LIKE $2
                   OR LOWER(COALESCE(service_type, '')) LIKE $2)
            ORDER BY created_at DESC
            "#,
            SUBMISSION_COLUMNS
        );

        let submissions = sqlx::query_as::<_, Submission>(&sql)
            .bind(user_id)
            .bind(like_pattern(search))
            .fetch_all(&self.pool)
            .await?;

        Ok(submissions)
    }

    /// Every submission, newest first, with optional search and status filter
    pub async fn list_all(
        &self,
        search: Option<&str>,
        status: Option<SubmissionStatus>,
    ) -> Result<Vec<Submission>, SubmissionError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM submissions
            WHERE ($1::text IS NULL
                   OR LOWER(name) LIKE $1
                   OR LOWER(call_up) LIKE $1
                   OR LOWER(course) LIKE $1
                   OR LOWER(COALESCE(nysc_email, '')) LIKE $1
                   OR LOWER(state_of_origin) LIKE $1
                   OR LOWER(state_of_choices) LIKE $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
            SUBMISSION_COLUMNS
        );

        let submissions = sqlx::query_as::<_, Submission>(&sql)
            .bind(like_pattern(search))
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await?;

        Ok(submissions)
    }

    /// Write reviewed values
    /// Apply review changes only if the row still has `expected_status`.
    /// `None` means the submission is missing or another review got there first.
    pub async fn update_review(
        &self,
        id: Uuid,
        expected_status: SubmissionStatus,
        changes: &SubmissionChanges,
    ) -> Result<Option<Submission>, SubmissionError> {
        let sql = format!(
            r#"
            UPDATE submissions
            SET status = $2, payment_verified = $3, remarks = $4, admin_notes = $5,
                updated_at = NOW()
            WHERE id = $1 AND status = $6
            RETURNING {}
            "#,
            SUBMISSION_COLUMNS
        );

        let updated = sqlx::query_as::<_, Submission>(&sql)
            .bind(id)
            .bind(changes.status)
            .bind(changes.payment_verified)
            .bind(&changes.remarks)
            .bind(&changes.admin_notes)
            .bind(expected_status)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    /// (status, payment_verified) pairs, optionally for one user
    pub async fn status_rows(
        &self,
        user_id: Option<Uuid>,
    ) -> Result<Vec<(SubmissionStatus, bool)>, SubmissionError> {
        let rows = sqlx::query_as::<_, (SubmissionStatus, bool)>(
            "SELECT status, payment_verified FROM submissions
             WHERE $1::uuid IS NULL OR user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
