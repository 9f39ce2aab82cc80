use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Kind of admin action recorded in the activity log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    StatusChange,
    PaymentVerification,
    MessageResponse,
    BulkApprove,
    BulkReject,
    BulkPaymentVerify,
    UserMessageSent,
    SubmissionUpdated,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::StatusChange => "status_change",
            ActionType::PaymentVerification => "payment_verification",
            ActionType::MessageResponse => "message_response",
            ActionType::BulkApprove => "bulk_approve",
            ActionType::BulkReject => "bulk_reject",
            ActionType::BulkPaymentVerify => "bulk_payment_verify",
            ActionType::UserMessageSent => "user_message_sent",
            ActionType::SubmissionUpdated => "submission_updated",
        }
    }
}

/// What an activity entry refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Submission,
    Message,
    User,
    BulkAction,
}

/// "bulk_payment_verify" → "Bulk Payment Verify"
pub fn action_label(action_type: &str) -> String {
    action_type
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Activity log row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ActivityLog {
    pub id: Uuid,
    pub admin_id: Option<Uuid>,
    pub admin_email: String,
    pub action_type: ActionType,
    pub entity_type: EntityType,
    pub entity_id: Option<Uuid>,
    pub details: String,
    pub created_at: DateTime<Utc>,
}

/// Activity entry as listed on the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivityEntry {
    #[serde(flatten)]
    pub log: ActivityLog,
    #[schema(example = "Status Change")]
    pub label: String,
}

impl From<ActivityLog> for ActivityEntry {
    fn from(log: ActivityLog) -> Self {
        let label = action_label(log.action_type.as_str());
        Self { log, label }
    }
}

/// Entry to append to the activity log
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub admin_id: Uuid,
    pub admin_email: String,
    pub action_type: ActionType,
    pub entity_type: EntityType,
    pub entity_id: Option<Uuid>,
    pub details: String,
}

pub const DEFAULT_ACTIVITY_LIMIT: i64 = 10;
pub const MAX_ACTIVITY_LIMIT: i64 = 100;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ActivityQuery {
    /// Number of entries, default 10, at most 100
    pub limit: Option<i64>,
}

impl ActivityQuery {
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
            .clamp(1, MAX_ACTIVITY_LIMIT)
    }
}
