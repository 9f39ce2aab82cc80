use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::submissions::SubmissionStatus;
use crate::support::{has_unread_response, MessageStatus};

/// Kind of entry in a user's notification history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    StatusChange,
    PaymentVerified,
    AdminResponse,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::StatusChange => "status_change",
            NotificationType::PaymentVerified => "payment_verified",
            NotificationType::AdminResponse => "admin_response",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    /// Related record ids, e.g. `{"submission_id": "..."}`
    #[schema(value_type = Object)]
    pub metadata: serde_json::Value,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Notification to store for a user
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub metadata: serde_json::Value,
}

pub const DEFAULT_NOTIFICATION_LIMIT: i64 = 50;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct NotificationQuery {
    /// Number of entries, default 50, at most 200
    pub limit: Option<i64>,
    /// Only unread entries
    #[serde(default)]
    pub unread_only: bool,
}

impl NotificationQuery {
    pub fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_NOTIFICATION_LIMIT).clamp(1, 200)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MarkedRead {
    pub updated: u64,
}

/// Per-user delivery toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct NotificationPreferences {
    pub email_submission_updates: bool,
    pub email_payment_verification: bool,
    pub email_admin_responses: bool,
    pub push_submission_updates: bool,
    pub push_payment_verification: bool,
    pub push_admin_responses: bool,
    pub sound_enabled: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email_submission_updates: true,
            email_payment_verification: true,
            email_admin_responses: true,
            push_submission_updates: true,
            push_payment_verification: true,
            push_admin_responses: true,
            sound_enabled: true,
        }
    }
}

impl NotificationPreferences {
    pub fn allows_email(&self, kind: NotificationType) -> bool {
        match kind {
            NotificationType::StatusChange => self.email_submission_updates,
            NotificationType::PaymentVerified => self.email_payment_verification,
            NotificationType::AdminResponse => self.email_admin_responses,
        }
    }

    pub fn allows_push(&self, kind: NotificationType) -> bool {
        match kind {
            NotificationType::StatusChange => self.push_submission_updates,
            NotificationType::PaymentVerified => self.push_payment_verification,
            NotificationType::AdminResponse => self.push_admin_responses,
        }
    }
}

/// Partial preferences update; omitted fields keep their value
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdatePreferencesRequest {
    pub email_submission_updates: Option<bool>,
    pub email_payment_verification: Option<bool>,
    pub email_admin_responses: Option<bool>,
    pub push_submission_updates: Option<bool>,
    pub push_payment_verification: Option<bool>,
    pub push_admin_responses: Option<bool>,
    pub sound_enabled: Option<bool>,
}

impl UpdatePreferencesRequest {
    pub fn apply(&self, current: NotificationPreferences) -> NotificationPreferences {
        NotificationPreferences {
            email_submission_updates: self
                .email_submission_updates
                .unwrap_or(current.email_submission_updates),
            email_payment_verification: self
                .email_payment_verification
                .unwrap_or(current.email_payment_verification),
            email_admin_responses: self
                .email_admin_responses
                .unwrap_or(current.email_admin_responses),
            push_submission_updates: self
                .push_submission_updates
                .unwrap_or(current.push_submission_updates),
            push_payment_verification: self
                .push_payment_verification
                .unwrap_or(current.push_payment_verification),
            push_admin_responses: self
                .push_admin_responses
                .unwrap_or(current.push_admin_responses),
            sound_enabled: self.sound_enabled.unwrap_or(current.sound_enabled),
        }
    }
}

/// Outstanding items for a regular user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserAlertCounts {
    pub pending_submissions: i64,
    pub unverified_payments: i64,
    pub unread_messages: i64,
    pub total_alerts: i64,
}

impl UserAlertCounts {
    /// Count from the user's (status, payment_verified) and (status, admin_response) rows
    pub fn compute(
        submissions: &[(SubmissionStatus, bool)],
        messages: &[(MessageStatus, Option<String>)],
    ) -> Self {
        let pending_submissions = submissions
            .iter()
            .filter(|(status, _)| *status == SubmissionStatus::Pending)
            .count() as i64;
        let unverified_payments = submissions.iter().filter(|(_, verified)| !verified).count() as i64;
        let unread_messages = messages
            .iter()
            .filter(|(status, response)| has_unread_response(response.as_deref(), *status))
            .count() as i64;

        Self {
            pending_submissions,
            unverified_payments,
            unread_messages,
            total_alerts: pending_submissions + unverified_payments + unread_messages,
        }
    }
}

/// Outstanding work across all users
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AdminAlertCounts {
    pub pending_submissions: i64,
    pub open_messages: i64,
    pub total_alerts: i64,
}

impl AdminAlertCounts {
    pub fn new(pending_submissions: i64, open_messages: i64) -> Self {
        Self {
            pending_submissions,
            open_messages,
            total_alerts: pending_submissions + open_messages,
        }
    }
}

/// Counts as seen by the caller's role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum AlertCounts {
    User(UserAlertCounts),
    Admin(AdminAlertCounts),
}

impl AlertCounts {
    pub fn total(&self) -> i64 {
        match self {
            AlertCounts::User(counts) => counts.total_alerts,
            AlertCounts::Admin(counts) => counts.total_alerts,
        }
    }
}

/// Payload of the SSE `alert` event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct AlertEvent {
    pub total_alerts: i64,
    pub previous_total: i64,
    pub play_sound: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_default_to_enabled() {
        let prefs = NotificationPreferences::default();
        assert!(prefs.allows_email(NotificationType::StatusChange));
        assert!(prefs.allows_push(NotificationType::AdminResponse));
        assert!(prefs.sound_enabled);
    }

    #[test]
    fn test_update_keeps_omitted_fields() {
        let update = UpdatePreferencesRequest {
            email_admin_responses: Some(false),
            sound_enabled: Some(false),
            ..Default::default()
        };
        let prefs = update.apply(NotificationPreferences::default());

        assert!(!prefs.allows_email(NotificationType::AdminResponse));
        assert!(prefs.allows_email(NotificationType::PaymentVerified));
        assert!(prefs.allows_push(NotificationType::AdminResponse));
        assert!(!prefs.sound_enabled);
    }

    #[test]
    fn test_user_alert_counts() {
        let submissions = vec![
            (SubmissionStatus::Pending, false),
            (SubmissionStatus::Pending, true),
            (SubmissionStatus::Approved, false),
            (SubmissionStatus::Completed, true),
        ];
        let messages = vec![
            (MessageStatus::Resolved, Some("Fixed".to_string())),
            (MessageStatus::Closed, Some("Fixed".to_string())),
            (MessageStatus::Open, None),
        ];

        let counts = UserAlertCounts::compute(&submissions, &messages);
        assert_eq!(counts.pending_submissions, 2);
        assert_eq!(counts.unverified_payments, 2);
        assert_eq!(counts.unread_messages, 1);
        assert_eq!(counts.total_alerts, 5);
    }

    #[test]
    fn test_empty_counts_are_zero() {
        assert_eq!(UserAlertCounts::compute(&[], &[]), UserAlertCounts::default());
    }

    #[test]
    fn test_alert_counts_serialize_flat() {
        let value = serde_json::to_value(AlertCounts::Admin(AdminAlertCounts::new(3, 2))).unwrap();
        assert_eq!(value["pending_submissions"], 3);
        assert_eq!(value["open_messages"], 2);
        assert_eq!(value["total_alerts"], 5);
    }

    #[test]
    fn test_query_limit_is_clamped() {
        let query = NotificationQuery {
            limit: Some(10_000),
            unread_only: false,
        };
        assert_eq!(query.effective_limit(), 200);
        assert_eq!(NotificationQuery::default().effective_limit(), 50);
    }
}
