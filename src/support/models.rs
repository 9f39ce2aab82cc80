use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::validation::validate_trimmed_length;

/// Lifecycle of a support thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Open => "open",
            MessageStatus::InProgress => "in_progress",
            MessageStatus::Resolved => "resolved",
            MessageStatus::Closed => "closed",
        }
    }
}

impl Default for MessageStatus {
    fn default() -> Self {
        MessageStatus::Open
    }
}

impl std::fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user inquiry with an optional admin response
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SupportMessage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject: String,
    pub message: String,
    pub status: MessageStatus,
    pub admin_response: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SupportMessage {
    /// Answered and still active, from the user's point of view
    pub fn has_unread_response(&self) -> bool {
        has_unread_response(self.admin_response.as_deref(), self.status)
    }
}

/// A response counts as unread until the thread is closed
pub fn has_unread_response(admin_response: Option<&str>, status: MessageStatus) -> bool {
    admin_response.is_some_and(|r| !r.trim().is_empty()) && status != MessageStatus::Closed
}

fn validate_subject(subject: &str) -> Result<(), ValidationError> {
    validate_trimmed_length(subject, 3, 200)
}

fn validate_body(message: &str) -> Result<(), ValidationError> {
    validate_trimmed_length(message, 10, 2000)
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMessageRequest {
    /// 3 to 200 characters after trimming
    #[validate(custom = "validate_subject")]
    #[schema(example = "Payment not reflecting")]
    pub subject: String,
    /// 10 to 2000 characters after trimming
    #[validate(custom = "validate_body")]
    pub message: String,
}

/// Admin reply to a support message
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RespondMessageRequest {
    #[validate(length(min = 1, max = 5000), custom = "crate::validation::validate_not_blank")]
    pub admin_response: String,
    pub status: MessageStatus,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AdminMessageQuery {
    /// Matches subject, message or admin response
    pub search: Option<String>,
    pub status: Option<MessageStatus>,
}

/// "Responded to message: \"{subject}\" (status: {old} → {new})"
pub fn response_activity_details(subject: &str, old: MessageStatus, new: MessageStatus) -> String {
    format!(
        "Responded to message: \"{}\" (status: {} → {})",
        subject, old, new
    )
}
