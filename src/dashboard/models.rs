use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::submissions::SubmissionStatus;

/// The columns of a submission the dashboards aggregate over
#[derive(Debug, Clone, FromRow)]
pub struct SubmissionStat {
    pub status: SubmissionStatus,
    pub payment_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Submissions created on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DailyCount {
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    /// Short label, e.g. "Mar 9"
    pub label: String,
    pub submissions: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatusSlice {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDashboard {
    pub total_submissions: i64,
    pub pending_submissions: i64,
    pub approved_submissions: i64,
    pub rejected_submissions: i64,
    pub verified_payments: i64,
    pub total_messages: i64,
    pub open_messages: i64,
    /// Last 7 days ending today, oldest first
    pub submission_trend: Vec<DailyCount>,
    /// Pending, approved and rejected counts, zero entries omitted
    pub status_breakdown: Vec<StatusSlice>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminDashboard {
    pub total_submissions: i64,
    pub verified_payments: i64,
    pub pending_submissions: i64,
    pub total_messages: i64,
    pub open_messages: i64,
    pub closed_messages: i64,
    pub total_users: i64,
    /// Whole percent of submissions with verified payment
    pub payment_verification_rate: i64,
    /// Whole percent of messages that are closed
    pub message_resolution_rate: i64,
    /// Submissions per registered user, one decimal place
    pub avg_submissions_per_user: f64,
}
