// Activity logger
//
// Records admin actions. Failures are logged and never reach the caller.

use sqlx::PgPool;
use tracing::{debug, error};

use crate::activity::{ActivityLog, NewActivity};

#[derive(Clone)]
pub struct ActivityLogger {
    pool: PgPool,
}

impl ActivityLogger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append an entry to the activity log
    pub async fn log(&self, activity: NewActivity) {
        match self.insert(&activity).await {
            Ok(()) => debug!(
                action = activity.action_type.as_str(),
                admin_id = %activity.admin_id,
                "Activity recorded"
            ),
            Err(e) => error!(
                action = activity.action_type.as_str(),
                admin_id = %activity.admin_id,
                "Failed to record activity: {}",
                e
            ),
        }
    }

    async fn insert(&self, activity: &NewActivity) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO activity_logs (admin_id, admin_email, action_type, entity_type, entity_id, details)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(activity.admin_id)
        .bind(&activity.admin_email)
        .bind(activity.action_type)
        .bind(activity.entity_type)
        .bind(activity.entity_id)
        .bind(&activity.details)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Most recent entries, newest first
    pub async fn recent(&self, limit: i64) -> Result<Vec<ActivityLog>, sqlx::Error> {
        sqlx::query_as::<_, ActivityLog>(
            r#"
            SELECT id, admin_id, admin_email, action_type, entity_type, entity_id, details, created_at
            FROM activity_logs
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
