use tracing::info;
use uuid::Uuid;

use crate::activity::{ActionType, ActivityLogger, EntityType, NewActivity};
use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::export::{format_timestamp, or_placeholder};
use crate::notifications::{ChangeAction, ChangeEvent, ChangeFeed, NotificationService};
use crate::support::{
    response_activity_details, CreateMessageRequest, MessageStatus, RespondMessageRequest,
    SupportMessage, SupportRepository,
};

pub const MESSAGE_EXPORT_HEADERS: [&str; 5] =
    ["Subject", "Message", "Status", "Admin Response", "Created At"];

/// One CSV row of the message export
pub fn message_export_row(message: &SupportMessage) -> Vec<String> {
    vec![
        message.subject.clone(),
        message.message.clone(),
        message.status.to_string(),
        or_placeholder(message.admin_response.as_deref(), "No response yet"),
        format_timestamp(message.created_at),
    ]
}

#[derive(Clone)]
pub struct SupportService {
    repo: SupportRepository,
    activity: ActivityLogger,
    notifications: NotificationService,
    feed: ChangeFeed,
}

impl SupportService {
    pub fn new(
        repo: SupportRepository,
        activity: ActivityLogger,
        notifications: NotificationService,
        feed: ChangeFeed,
    ) -> Self {
        Self {
            repo,
            activity,
            notifications,
            feed,
        }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        request: &CreateMessageRequest,
    ) -> Result<SupportMessage, ApiError> {
        let message = self
            .repo
            .create(user_id, &request.subject, &request.message)
            .await?;

        info!(message_id = %message.id, %user_id, "Support message created");
        self.feed.publish(ChangeEvent::support_message(
            ChangeAction::Insert,
            message.id,
            user_id,
        ));

        Ok(message)
    }

    pub async fn list_mine(&self, user_id: Uuid) -> Result<Vec<SupportMessage>, ApiError> {
        Ok(self.repo.list_for_user(user_id).await?)
    }

    pub async fn list_all(
        &self,
        search: Option<&str>,
        status: Option<MessageStatus>,
    ) -> Result<Vec<SupportMessage>, ApiError> {
        Ok(self.repo.list_all(search, status).await?)
    }

    /// Store the admin response, then log, notify and publish
    pub async fn respond(
        &self,
        admin: &AuthenticatedUser,
        id: Uuid,
        request: &RespondMessageRequest,
    ) -> Result<SupportMessage, ApiError> {
        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Support message", id))?;

        let updated = self
            .repo
            .respond(id, &request.admin_response, request.status)
            .await?
            .ok_or_else(|| ApiError::not_found("Support message", id))?;

        info!(
            message_id = %id,
            admin_id = %admin.user_id,
            old_status = %current.status,
            new_status = %updated.status,
            "Support message answered"
        );

        self.activity
            .log(NewActivity {
                admin_id: admin.user_id,
                admin_email: admin.email.clone(),
                action_type: ActionType::MessageResponse,
                entity_type: EntityType::Message,
                entity_id: Some(id),
                details: response_activity_details(
                    &updated.subject,
                    current.status,
                    updated.status,
                ),
            })
            .await;

        self.notifications.notify_admin_response(&updated).await;
        self.feed.publish(ChangeEvent::support_message(
            ChangeAction::Update,
            id,
            updated.user_id,
        ));

        Ok(updated)
    }

    /// CSV of the messages matching the admin list filters
    pub async fn export_csv(
        &self,
        search: Option<&str>,
        status: Option<MessageStatus>,
    ) -> Result<String, ApiError> {
        let messages = self.repo.list_all(search, status).await?;
        crate::export::to_csv(&MESSAGE_EXPORT_HEADERS, messages.iter().map(message_export_row))
    }
}
