use sqlx::PgPool;
use uuid::Uuid;

use crate::db::like_pattern;
use crate::support::{MessageStatus, SupportMessage};

const MESSAGE_COLUMNS: &str =
    "id, user_id, subject, message, status, admin_response, created_at, updated_at";

/// Repository for support messages
#[derive(Clone)]
pub struct SupportRepository {
    pool: PgPool,
}

impl SupportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an open message; subject and body are stored trimmed
    pub async fn create(
        &self,
        user_id: Uuid,
        subject: &str,
        message: &str,
    ) -> Result<SupportMessage, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO support_messages (user_id, subject, message, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            MESSAGE_COLUMNS
        );

        sqlx::query_as::<_, SupportMessage>(&sql)
            .bind(user_id)
            .bind(subject.trim())
            .bind(message.trim())
            .bind(MessageStatus::Open)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<SupportMessage>, sqlx::Error> {
        let sql = format!("SELECT {} FROM support_messages WHERE id = $1", MESSAGE_COLUMNS);
        sqlx::query_as::<_, SupportMessage>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// A user's messages, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<SupportMessage>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM support_messages WHERE user_id = $1 ORDER BY created_at DESC",
            MESSAGE_COLUMNS
        );
        sqlx::query_as::<_, SupportMessage>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
    }

    /// Every message, newest first
    pub async fn list_all(
        &self,
        search: Option<&str>,
        status: Option<MessageStatus>,
    ) -> Result<Vec<SupportMessage>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {}
            FROM support_messages
            WHERE ($1::text IS NULL
                   OR LOWER(subject) LIKE $1
                   OR LOWER(message) LIKE $1
                   OR LOWER(COALESCE(admin_response, '')) LIKE $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
            MESSAGE_COLUMNS
        );

        sqlx::query_as::<_, SupportMessage>(&sql)
            .bind(like_pattern(search))
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await
    }

    pub async fn respond(
        &self,
        id: Uuid,
        admin_response: &str,
        status: MessageStatus,
    ) -> Result<Option<SupportMessage>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE support_messages
            SET admin_response = $2, status = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            MESSAGE_COLUMNS
        );

        sqlx::query_as::<_, SupportMessage>(&sql)
            .bind(id)
            .bind(admin_response.trim())
            .bind(status)
            .fetch_optional(&self.pool)
            .await
    }

    /// (status, admin_response) pairs, optionally for one user
    pub async fn status_rows(
        &self,
        user_id: Option<Uuid>,
    ) -> Result<Vec<(MessageStatus, Option<String>)>, sqlx::Error> {
        sqlx::query_as::<_, (MessageStatus, Option<String>)>(
            "SELECT status, admin_response FROM support_messages
             WHERE $1::uuid IS NULL OR user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}
