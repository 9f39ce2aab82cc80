use sqlx::PgPool;
use uuid::Uuid;

use crate::notifications::{NewNotification, Notification, NotificationPreferences};

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, notification_type, title, message, metadata, is_read, created_at";

const PREFERENCE_COLUMNS: &str = "email_submission_updates, email_payment_verification, \
     email_admin_responses, push_submission_updates, push_payment_verification, \
     push_admin_responses, sound_enabled";

/// Notification history and preferences
#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, notification: &NewNotification) -> Result<Notification, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO notification_history (user_id, notification_type, title, message, metadata)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            NOTIFICATION_COLUMNS
        );

        sqlx::query_as::<_, Notification>(&sql)
            .bind(notification.user_id)
            .bind(notification.notification_type)
            .bind(&notification.title)
            .bind(&notification.message)
            .bind(&notification.metadata)
            .fetch_one(&self.pool)
            .await
    }

    /// A user's notifications, newest first
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {}
            FROM notification_history
            WHERE user_id = $1 AND (NOT $2 OR is_read = FALSE)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
            NOTIFICATION_COLUMNS
        );

        sqlx::query_as::<_, Notification>(&sql)
            .bind(user_id)
            .bind(unread_only)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
    }

    /// Returns false when the notification does not belong to the user
    pub async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notification_history SET is_read = TRUE WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notification_history SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Stored preferences, or the defaults when the user never saved any
    pub async fn preferences(&self, user_id: Uuid) -> Result<NotificationPreferences, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM notification_preferences WHERE user_id = $1",
            PREFERENCE_COLUMNS
        );

        let prefs = sqlx::query_as::<_, NotificationPreferences>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(prefs.unwrap_or_default())
    }

    pub async fn save_preferences(
        &self,
        user_id: Uuid,
        prefs: &NotificationPreferences,
    ) -> Result<NotificationPreferences, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO notification_preferences (user_id, {cols})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id) DO UPDATE SET
                email_submission_updates = EXCLUDED.email_submission_updates,
                email_payment_verification = EXCLUDED.email_payment_verification,
                email_admin_responses = EXCLUDED.email_admin_responses,
                push_submission_updates = EXCLUDED.push_submission_updates,
                push_payment_verification = EXCLUDED.push_payment_verification,
                push_admin_responses = EXCLUDED.push_admin_responses,
                sound_enabled = EXCLUDED.sound_enabled,
                updated_at = NOW()
            RETURNING {cols}
            "#,
            cols = PREFERENCE_COLUMNS
        );

        sqlx::query_as::<_, NotificationPreferences>(&sql)
            .bind(user_id)
            .bind(prefs.email_submission_updates)
            .bind(prefs.email_payment_verification)
            .bind(prefs.email_admin_responses)
            .bind(prefs.push_submission_updates)
            .bind(prefs.push_payment_verification)
            .bind(prefs.push_admin_responses)
            .bind(prefs.sound_enabled)
            .fetch_one(&self.pool)
            .await
    }
}
