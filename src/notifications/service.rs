use serde_json::json;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::auth::{AuthenticatedUser, UserRepository};
use crate::email::{Mailer, SubmissionUpdateEmail, SupportResponseEmail};
use crate::error::ApiError;
use crate::notifications::{
    AdminAlertCounts, AlertCounts, NewNotification, Notification, NotificationPreferences,
    NotificationRepository, NotificationType, UpdatePreferencesRequest, UserAlertCounts,
};
use crate::submissions::{Submission, SubmissionRepository, SubmissionStatus};
use crate::support::{MessageStatus, SupportMessage, SupportRepository};

/// Notifications owed to the owner when a submission changes from `before` to `after`
pub fn plan_submission_notifications(before: &Submission, after: &Submission) -> Vec<NewNotification> {
    let mut planned = Vec::new();

    if before.status != after.status {
        planned.push(NewNotification {
            user_id: after.user_id,
            notification_type: NotificationType::StatusChange,
            title: "Submission Status Updated".to_string(),
            message: format!(
                "Your submission {} is now {}.",
                after.call_up,
                after.status.label()
            ),
            metadata: json!({
                "submission_id": after.id,
                "old_status": before.status,
                "new_status": after.status,
            }),
        });
    }

    if !before.payment_verified && after.payment_verified {
        planned.push(NewNotification {
            user_id: after.user_id,
            notification_type: NotificationType::PaymentVerified,
            title: "Payment Verified".to_string(),
            message: format!("Your payment for submission {} has been verified.", after.call_up),
            metadata: json!({ "submission_id": after.id }),
        });
    }

    planned
}

/// Notification for an admin reply to a support message
pub fn plan_admin_response(message: &SupportMessage) -> NewNotification {
    NewNotification {
        user_id: message.user_id,
        notification_type: NotificationType::AdminResponse,
        title: "New Response to Your Support Request".to_string(),
        message: format!("An admin has responded to \"{}\".", message.subject),
        metadata: json!({
            "message_id": message.id,
            "status": message.status,
        }),
    }
}

/// Stores notification history, sends emails per preferences and computes alert counts
#[derive(Clone)]
pub struct NotificationService {
    repo: NotificationRepository,
    users: UserRepository,
    submissions: SubmissionRepository,
    support: SupportRepository,
    mailer: Mailer,
}

impl NotificationService {
    pub fn new(
        repo: NotificationRepository,
        users: UserRepository,
        submissions: SubmissionRepository,
        support: SupportRepository,
        mailer: Mailer,
    ) -> Self {
        Self {
            repo,
            users,
            submissions,
            support,
            mailer,
        }
    }

    /// Record and email the owner about a reviewed submission; never fails
    pub async fn notify_submission_change(&self, before: &Submission, after: &Submission) {
        let planned = plan_submission_notifications(before, after);
        if planned.is_empty() {
            return;
        }

        for notification in &planned {
            self.store(notification).await;
        }

        // One email per change, titled after the first event the user wants mailed
        let prefs = self.preferences_or_default(after.user_id).await;
        let Some(primary) = planned
            .iter()
            .find(|n| prefs.allows_email(n.notification_type))
        else {
            debug!(user_id = %after.user_id, "Submission email disabled by preferences");
            return;
        };

        let Some((email, user_name)) = self.recipient(after.user_id).await else {
            return;
        };

        self.mailer.send_submission_update(
            &email,
            &SubmissionUpdateEmail {
                user_name,
                title: primary.title.clone(),
                summary: primary.message.clone(),
                applicant: after.name.clone(),
                call_up: after.call_up.clone(),
                status: after.status.label().to_string(),
                payment_verified: after.payment_verified,
                remarks: after.remarks.clone(),
            },
        );
    }

    /// Record and email the owner about an admin response; never fails
    pub async fn notify_admin_response(&self, message: &SupportMessage) {
        let notification = plan_admin_response(message);
        self.store(&notification).await;

        let prefs = self.preferences_or_default(message.user_id).await;
        if !prefs.allows_email(NotificationType::AdminResponse) {
            debug!(user_id = %message.user_id, "Support response email disabled by preferences");
            return;
        }

        let Some(admin_response) = message.admin_response.clone() else {
            return;
        };
        let Some((email, user_name)) = self.recipient(message.user_id).await else {
            return;
        };

        self.mailer.send_support_response(
            &email,
            &SupportResponseEmail {
                user_name,
                message_subject: message.subject.clone(),
                user_message: message.message.clone(),
                admin_response,
            },
        );
    }

    async fn store(&self, notification: &NewNotification) {
        if let Err(e) = self.repo.create(notification).await {
            error!(
                user_id = %notification.user_id,
                kind = notification.notification_type.as_str(),
                "Failed to store notification: {}",
                e
            );
        }
    }

    async fn preferences_or_default(&self, user_id: Uuid) -> NotificationPreferences {
        match self.repo.preferences(user_id).await {
            Ok(prefs) => prefs,
            Err(e) => {
                warn!(%user_id, "Failed to load notification preferences: {}", e);
                NotificationPreferences::default()
            }
        }
    }

    async fn recipient(&self, user_id: Uuid) -> Option<(String, Option<String>)> {
        match self.users.find_by_id(user_id).await {
            Ok(Some(user)) => Some((user.email, user.full_name)),
            Ok(None) => {
                warn!(%user_id, "Notification recipient no longer exists");
                None
            }
            Err(e) => {
                error!(%user_id, "Failed to look up notification recipient: {}", e);
                None
            }
        }
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>, ApiError> {
        Ok(self.repo.list_for_user(user_id, unread_only, limit).await?)
    }

    pub async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
        if self.repo.mark_read(id, user_id).await? {
            Ok(())
        } else {
            Err(ApiError::not_found("Notification", id))
        }
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, ApiError> {
        Ok(self.repo.mark_all_read(user_id).await?)
    }

    pub async fn preferences(&self, user_id: Uuid) -> Result<NotificationPreferences, ApiError> {
        Ok(self.repo.preferences(user_id).await?)
    }

    pub async fn update_preferences(
        &self,
        user_id: Uuid,
        update: &UpdatePreferencesRequest,
    ) -> Result<NotificationPreferences, ApiError> {
        let current = self.repo.preferences(user_id).await?;
        let merged = update.apply(current);
        Ok(self.repo.save_preferences(user_id, &merged).await?)
    }

    /// Outstanding items for the caller; admins see work across all users
    pub async fn alert_counts(&self, caller: &AuthenticatedUser) -> Result<AlertCounts, ApiError> {
        if caller.is_admin() {
            let pending = self
                .submissions
                .status_rows(None)
                .await?
                .iter()
                .filter(|(status, _)| *status == SubmissionStatus::Pending)
                .count() as i64;
            let open = self
                .support
                .status_rows(None)
                .await?
                .iter()
                .filter(|(status, _)| *status == MessageStatus::Open)
                .count() as i64;

            return Ok(AlertCounts::Admin(AdminAlertCounts::new(pending, open)));
        }

        let submissions = self
            .submissions
            .status_rows(Some(caller.user_id))
            .await?;
        let messages = self.support.status_rows(Some(caller.user_id)).await?;

        Ok(AlertCounts::User(UserAlertCounts::compute(&submissions, &messages)))
    }
}
