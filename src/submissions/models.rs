use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::pricing::ServiceType;
use crate::validation::{validate_not_blank, validate_state_code};

/// Review status of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    InProgress,
    Approved,
    Rejected,
    Completed,
}

impl SubmissionStatus {
    pub const ALL: [SubmissionStatus; 5] = [
        SubmissionStatus::Pending,
        SubmissionStatus::InProgress,
        SubmissionStatus::Approved,
        SubmissionStatus::Rejected,
        SubmissionStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::InProgress => "in_progress",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
            SubmissionStatus::Completed => "completed",
        }
    }

    /// Human label, e.g. "In Progress"
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "Pending",
            SubmissionStatus::InProgress => "In Progress",
            SubmissionStatus::Approved => "Approved",
            SubmissionStatus::Rejected => "Rejected",
            SubmissionStatus::Completed => "Completed",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        SubmissionStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| format!("Invalid submission status: {}", s))
    }
}

impl Default for SubmissionStatus {
    fn default() -> Self {
        SubmissionStatus::Pending
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A posting-service application
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Submission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub course: String,
    pub call_up: String,
    pub state_of_origin: String,
    pub state_of_choices: String,
    pub state_code: Option<String>,
    pub service_type: Option<ServiceType>,
    #[schema(value_type = f64, example = 130000)]
    pub calculated_amount: Decimal,
    pub status: SubmissionStatus,
    pub payment_verified: bool,
    pub payment_proof_url: String,
    pub remarks: Option<String>,
    pub admin_notes: Option<String>,
    pub nysc_email: Option<String>,
    pub nysc_password: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Submission {
    /// Copy for the owner: internal admin notes are withheld
    pub fn for_owner(mut self) -> Self {
        self.admin_notes = None;
        self
    }
}

/// Applicant-supplied fields of a new submission, collected from the multipart form
#[derive(Debug, Clone, Default, Validate)]
pub struct NewSubmission {
    #[validate(length(min = 2, max = 100), custom = "validate_not_blank")]
    pub name: String,
    #[validate(length(min = 2, max = 100), custom = "validate_not_blank")]
    pub course: String,
    #[validate(length(min = 2, max = 50), custom = "validate_not_blank")]
    pub call_up: String,
    #[validate(length(min = 2, max = 50), custom = "validate_not_blank")]
    pub state_of_origin: String,
    #[validate(length(min = 2, max = 200), custom = "validate_not_blank")]
    pub state_of_choices: String,
    #[validate(custom = "validate_state_code")]
    pub state_code: Option<String>,
    pub service_type: Option<ServiceType>,
    #[validate(email)]
    pub nysc_email: Option<String>,
    #[validate(length(max = 200))]
    pub nysc_password: Option<String>,
}

impl NewSubmission {
    /// Assign a text form field by name; unknown names are ignored.
    /// Empty optional values are stored as absent.
    pub fn set_field(&mut self, name: &str, value: String) -> Result<(), String> {
        let optional = |v: String| {
            let trimmed = v.trim().to_string();
            (!trimmed.is_empty()).then_some(trimmed)
        };

        match name {
            "name" => self.name = value.trim().to_string(),
            "course" => self.course = value.trim().to_string(),
            "call_up" => self.call_up = value.trim().to_string(),
            "state_of_origin" => self.state_of_origin = value.trim().to_string(),
            "state_of_choices" => self.state_of_choices = value.trim().to_string(),
            "state_code" => self.state_code = optional(value),
            "service_type" => {
                self.service_type = match optional(value) {
                    Some(raw) => Some(ServiceType::from_str(&raw)?),
                    None => None,
                }
            }
            "nysc_email" => self.nysc_email = optional(value),
            "nysc_password" => self.nysc_password = optional(value),
            _ => {}
        }
        Ok(())
    }
}

/// Query parameters for a user's own submissions
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SubmissionListQuery {
    /// Matches name, course, call up, states, status or service type
    pub search: Option<String>,
}

/// Query parameters for the admin submission list and export
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AdminSubmissionQuery {
    /// Matches name, call up, course, NYSC email or states
    pub search: Option<String>,
    /// Exact status filter
    pub status: Option<SubmissionStatus>,
}

/// Admin review of a single submission; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ReviewSubmissionRequest {
    pub status: Option<SubmissionStatus>,
    pub payment_verified: Option<bool>,
    #[validate(length(max = 2000))]
    pub remarks: Option<String>,
    #[validate(length(max = 2000))]
    pub admin_notes: Option<String>,
}

impl ReviewSubmissionRequest {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.payment_verified.is_none()
            && self.remarks.is_none()
            && self.admin_notes.is_none()
    }
}

/// Resolved values written by a review
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionChanges {
    pub status: SubmissionStatus,
    pub payment_verified: bool,
    pub remarks: Option<String>,
    pub admin_notes: Option<String>,
}

impl SubmissionChanges {
    /// Merge a review request over the current record
    pub fn merge(current: &Submission, request: &ReviewSubmissionRequest) -> Self {
        let clean = |v: &Option<String>, fallback: &Option<String>| match v {
            Some(text) if text.trim().is_empty() => None,
            Some(text) => Some(text.trim().to_string()),
            None => fallback.clone(),
        };

        Self {
            status: request.status.unwrap_or(current.status),
            payment_verified: request.payment_verified.unwrap_or(current.payment_verified),
            remarks: clean(&request.remarks, &current.remarks),
            admin_notes: clean(&request.admin_notes, &current.admin_notes),
        }
    }
}

/// Action applied to many submissions at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Approve,
    Reject,
    VerifyPayment,
}

impl BulkAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BulkAction::Approve => "approve",
            BulkAction::Reject => "reject",
            BulkAction::VerifyPayment => "verify_payment",
        }
    }

    /// Status a bulk action moves submissions to, if any
    pub fn target_status(&self) -> Option<SubmissionStatus> {
        match self {
            BulkAction::Approve => Some(SubmissionStatus::Approved),
            BulkAction::Reject => Some(SubmissionStatus::Rejected),
            BulkAction::VerifyPayment => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BulkActionRequest {
    pub action: BulkAction,
    #[validate(length(min = 1, max = 500))]
    pub ids: Vec<Uuid>,
}

/// A submission left untouched by a bulk action
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SkippedSubmission {
    pub id: Uuid,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkActionResponse {
    pub action: BulkAction,
    pub updated: Vec<Uuid>,
    pub skipped: Vec<SkippedSubmission>,
}
