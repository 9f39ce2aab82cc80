use std::collections::{HashMap, HashSet};

use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::activity::{ActionType, ActivityLogger, EntityType, NewActivity};
use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::export::{format_timestamp, or_placeholder, to_csv, yes_no};
use crate::notifications::{ChangeAction, ChangeEvent, ChangeFeed, NotificationService};
use crate::pricing::FeeCalculator;
use crate::submissions::{
    BulkAction, BulkActionRequest, BulkActionResponse, NewSubmission, ProofStorage, ProofUpload,
    ReviewSubmissionRequest, SkippedSubmission, StatusMachine, Submission, SubmissionChanges,
    SubmissionError, SubmissionRepository, SubmissionStatus,
};

/// Reported when the row's status moved between read and write
pub const STALE_REVIEW: &str = "Submission was changed by another reviewer; reload and try again";

pub const SUBMISSION_EXPORT_HEADERS: [&str; 12] = [
    "Name",
    "Course",
    "Call Up Number",
    "State of Origin",
    "State of Choices",
    "Service Type",
    "Amount",
    "Status",
    "Payment Verified",
    "NYSC Email",
    "Remarks",
    "Created At",
];

pub fn submission_export_row(submission: &Submission) -> Vec<String> {
    vec![
        submission.name.clone(),
        submission.course.clone(),
        submission.call_up.clone(),
        submission.state_of_origin.clone(),
        submission.state_of_choices.clone(),
        submission
            .service_type
            .map(|s| s.display_name().to_string())
            .unwrap_or_else(|| "N/A".to_string()),
        submission.calculated_amount.to_string(),
        submission.status.label().to_string(),
        yes_no(submission.payment_verified),
        or_placeholder(submission.nysc_email.as_deref(), "N/A"),
        or_placeholder(submission.remarks.as_deref(), ""),
        format_timestamp(submission.created_at),
    ]
}

/// Activity entries describing a review of `before` into `after`
pub fn review_activities(before: &Submission, after: &Submission) -> Vec<(ActionType, String)> {
    let mut entries = Vec::new();

    if before.status != after.status {
        entries.push((
            ActionType::StatusChange,
            format!(
                "Changed status of {}'s submission from {} to {}",
                after.name, before.status, after.status
            ),
        ));
    }

    if before.payment_verified != after.payment_verified {
        let verb = if after.payment_verified { "verified" } else { "unverified" };
        entries.push((
            ActionType::PaymentVerification,
            format!("Marked payment as {} for {}'s submission", verb, after.name),
        ));
    }

    if entries.is_empty()
        && (before.remarks != after.remarks || before.admin_notes != after.admin_notes)
    {
        entries.push((
            ActionType::SubmissionUpdated,
            format!("Updated remarks for {}'s submission", after.name),
        ));
    }

    entries
}

/// Values a bulk action writes to one submission, or why it is skipped
pub fn bulk_changes(action: BulkAction, current: &Submission) -> Result<SubmissionChanges, String> {
    let mut changes = SubmissionChanges {
        status: current.status,
        payment_verified: current.payment_verified,
        remarks: current.remarks.clone(),
        admin_notes: current.admin_notes.clone(),
    };

    match action.target_status() {
        Some(target) => {
            if current.status == target {
                return Err(format!("Already {}", target));
            }
            changes.status = StatusMachine::transition(current.status, target)?;
        }
        None => {
            if current.payment_verified {
                return Err("Payment already verified".to_string());
            }
            changes.payment_verified = true;
        }
    }

    Ok(changes)
}

fn bulk_action_type(action: BulkAction) -> ActionType {
    match action {
        BulkAction::Approve => ActionType::BulkApprove,
        BulkAction::Reject => ActionType::BulkReject,
        BulkAction::VerifyPayment => ActionType::BulkPaymentVerify,
    }
}

fn bulk_details(action: BulkAction, count: usize) -> String {
    let verb = match action {
        BulkAction::Approve => "Approved",
        BulkAction::Reject => "Rejected",
        BulkAction::VerifyPayment => "Verified payment for",
    };
    format!("Bulk action: {} {} submission(s)", verb, count)
}

/// Submission workflow: intake, review, bulk actions and export
#[derive(Clone)]
pub struct SubmissionService {
    repo: SubmissionRepository,
    storage: ProofStorage,
    activity: ActivityLogger,
    notifications: NotificationService,
    feed: ChangeFeed,
}

impl SubmissionService {
    pub fn new(
        repo: SubmissionRepository,
        storage: ProofStorage,
        activity: ActivityLogger,
        notifications: NotificationService,
        feed: ChangeFeed,
    ) -> Self {
        Self {
            repo,
            storage,
            activity,
            notifications,
            feed,
        }
    }

    /// Create a pending submission; the fee is always computed here
    pub async fn create(
        &self,
        user_id: Uuid,
        form: NewSubmission,
        proof: Option<ProofUpload>,
    ) -> Result<Submission, SubmissionError> {
        form.validate()?;
        if form.service_type.is_none() {
            return Err(SubmissionError::ValidationError(
                "Please select a service type".to_string(),
            ));
        }
        let proof = proof.ok_or(SubmissionError::MissingProof)?;

        let amount = FeeCalculator::calculate(form.service_type, &form.state_of_choices);
        let stored = self.storage.store(user_id, &proof).await?;

        let submission = match self.repo.create(user_id, &form, amount, &stored.url).await {
            Ok(submission) => submission,
            Err(e) => {
                self.storage.remove(&stored.key).await;
                return Err(e);
            }
        };

        info!(
            submission_id = %submission.id,
            %user_id,
            amount = %amount,
            "Submission created"
        );
        self.feed.publish(ChangeEvent::submission(
            ChangeAction::Insert,
            submission.id,
            user_id,
        ));

        Ok(submission)
    }

    pub async fn list_mine(
        &self,
        user_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<Submission>, SubmissionError> {
        let submissions = self.repo.list_for_user(user_id, search).await?;
        Ok(submissions.into_iter().map(Submission::for_owner).collect())
    }

    /// Owners get their own record without admin notes; admins get any record
    pub async fn get(
        &self,
        caller: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<Submission, SubmissionError> {
        let submission = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(SubmissionError::NotFound)?;

        if caller.is_admin() {
            Ok(submission)
        } else if submission.user_id == caller.user_id {
            Ok(submission.for_owner())
        } else {
            warn!(submission_id = %id, user_id = %caller.user_id, "Access to another user's submission denied");
            Err(SubmissionError::Forbidden(
                "You do not have access to this submission".to_string(),
            ))
        }
    }

    pub async fn list_all(
        &self,
        search: Option<&str>,
        status: Option<SubmissionStatus>,
    ) -> Result<Vec<Submission>, SubmissionError> {
        self.repo.list_all(search, status).await
    }

    /// Apply an admin review
    pub async fn review(
        &self,
        admin: &AuthenticatedUser,
        id: Uuid,
        request: &ReviewSubmissionRequest,
    ) -> Result<Submission, SubmissionError> {
        request.validate()?;
        if request.is_empty() {
            return Err(SubmissionError::ValidationError(
                "No changes provided".to_string(),
            ));
        }

        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(SubmissionError::NotFound)?;

        let changes = SubmissionChanges::merge(&current, request);
        StatusMachine::transition(current.status, changes.status)
            .map_err(SubmissionError::InvalidTransition)?;

        let updated = self
            .repo
            .update_review(id, current.status, &changes)
            .await?
            .ok_or_else(|| SubmissionError::InvalidTransition(STALE_REVIEW.to_string()))?;
        info!(
            submission_id = %id,
            admin_id = %admin.user_id,
            status = %updated.status,
            payment_verified = updated.payment_verified,
            "Submission reviewed"
        );

        for (action_type, details) in review_activities(&current, &updated) {
            self.activity
                .log(NewActivity {
                    admin_id: admin.user_id,
                    admin_email: admin.email.clone(),
                    action_type,
                    entity_type: EntityType::Submission,
                    entity_id: Some(id),
                    details,
                })
                .await;
        }

        self.notifications
            .notify_submission_change(&current, &updated)
            .await;
        self.feed.publish(ChangeEvent::submission(
            ChangeAction::Update,
            id,
            updated.user_id,
        ));

        Ok(updated)
    }

    /// Apply one action to many submissions; ineligible ids are skipped
    pub async fn bulk(
        &self,
        admin: &AuthenticatedUser,
        request: &BulkActionRequest,
    ) -> Result<BulkActionResponse, SubmissionError> {
        request.validate()?;

        let mut seen = HashSet::new();
        let ids: Vec<Uuid> = request.ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        let mut by_id: HashMap<Uuid, Submission> = self
            .repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let mut updated = Vec::new();
        let mut skipped = Vec::new();

        for id in ids {
            let Some(current) = by_id.remove(&id) else {
                skipped.push(SkippedSubmission {
                    id,
                    reason: "Submission not found".to_string(),
                });
                continue;
            };

            let changes = match bulk_changes(request.action, &current) {
                Ok(changes) => changes,
                Err(reason) => {
                    skipped.push(SkippedSubmission { id, reason });
                    continue;
                }
            };

            let Some(after) = self.repo.update_review(id, current.status, &changes).await? else {
                skipped.push(SkippedSubmission {
                    id,
                    reason: STALE_REVIEW.to_string(),
                });
                continue;
            };
            self.notifications
                .notify_submission_change(&current, &after)
                .await;
            self.feed.publish(ChangeEvent::submission(
                ChangeAction::Update,
                id,
                after.user_id,
            ));
            updated.push(id);
        }

        info!(
            action = request.action.as_str(),
            admin_id = %admin.user_id,
            updated = updated.len(),
            skipped = skipped.len(),
            "Bulk submission action applied"
        );

        if !updated.is_empty() {
            self.activity
                .log(NewActivity {
                    admin_id: admin.user_id,
                    admin_email: admin.email.clone(),
                    action_type: bulk_action_type(request.action),
                    entity_type: EntityType::BulkAction,
                    entity_id: None,
                    details: bulk_details(request.action, updated.len()),
                })
                .await;
        }

        Ok(BulkActionResponse {
            action: request.action,
            updated,
            skipped,
        })
    }

    pub async fn export_csv(
        &self,
        search: Option<&str>,
        status: Option<SubmissionStatus>,
    ) -> Result<String, ApiError> {
        let submissions = self.repo.list_all(search, status).await?;
        to_csv(
            &SUBMISSION_EXPORT_HEADERS,
            submissions.iter().map(submission_export_row),
        )
    }
}
