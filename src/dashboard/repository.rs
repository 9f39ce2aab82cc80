use sqlx::PgPool;
use uuid::Uuid;

use crate::dashboard::SubmissionStat;
use crate::submissions::SubmissionStatus;
use crate::support::MessageStatus;

/// Read-only queries feeding the dashboards
#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn user_submissions(&self, user_id: Uuid) -> Result<Vec<SubmissionStat>, sqlx::Error> {
        sqlx::query_as::<_, SubmissionStat>(
            "SELECT status, payment_verified, created_at FROM submissions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn all_submissions(&self) -> Result<Vec<(SubmissionStatus, bool)>, sqlx::Error> {
        sqlx::query_as::<_, (SubmissionStatus, bool)>(
            "SELECT status, payment_verified FROM submissions",
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Message statuses, optionally for one user
    pub async fn message_statuses(
        &self,
        user_id: Option<Uuid>,
    ) -> Result<Vec<MessageStatus>, sqlx::Error> {
        sqlx::query_scalar::<_, MessageStatus>(
            "SELECT status FROM support_messages WHERE $1::uuid IS NULL OR user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn user_count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
    }
}
