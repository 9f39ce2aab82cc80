// Dashboard aggregation
//
// Pure functions over fetched rows so the counting rules can be tested
// without a database.

use chrono::{Duration, NaiveDate};

use crate::dashboard::{AdminDashboard, DailyCount, StatusSlice, SubmissionStat, UserDashboard};
use crate::submissions::SubmissionStatus;
use crate::support::MessageStatus;

pub const TREND_DAYS: i64 = 7;

/// Rounded whole percentage; 0 when `whole` is 0
pub fn percentage(part: i64, whole: i64) -> i64 {
    if whole == 0 {
        return 0;
    }
    (part as f64 * 100.0 / whole as f64).round() as i64
}

/// Ratio rounded to one decimal place; 0 when `count` is 0
pub fn average(total: i64, count: i64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    (total as f64 / count as f64 * 10.0).round() / 10.0
}

/// One bucket per day for the `TREND_DAYS` days ending `today`, zero-filled
pub fn submission_trend(submissions: &[SubmissionStat], today: NaiveDate) -> Vec<DailyCount> {
    (0..TREND_DAYS)
        .rev()
        .map(|days_back| {
            let date = today - Duration::days(days_back);
            let submissions = submissions
                .iter()
                .filter(|s| s.created_at.date_naive() == date)
                .count() as i64;
            DailyCount {
                date,
                label: date.format("%b %-d").to_string(),
                submissions,
            }
        })
        .collect()
}

fn count_status(submissions: &[SubmissionStat], status: SubmissionStatus) -> i64 {
    submissions.iter().filter(|s| s.status == status).count() as i64
}

fn count_messages(messages: &[MessageStatus], status: MessageStatus) -> i64 {
    messages.iter().filter(|&&m| m == status).count() as i64
}

pub fn user_dashboard(
    submissions: &[SubmissionStat],
    messages: &[MessageStatus],
    today: NaiveDate,
) -> UserDashboard {
    let pending = count_status(submissions, SubmissionStatus::Pending);
    let approved = count_status(submissions, SubmissionStatus::Approved);
    let rejected = count_status(submissions, SubmissionStatus::Rejected);

    let status_breakdown = [
        (SubmissionStatus::Pending, pending),
        (SubmissionStatus::Approved, approved),
        (SubmissionStatus::Rejected, rejected),
    ]
    .into_iter()
    .filter(|(_, value)| *value > 0)
    .map(|(status, value)| StatusSlice {
        name: status.label().to_string(),
        value,
    })
    .collect();

    UserDashboard {
        total_submissions: submissions.len() as i64,
        pending_submissions: pending,
        approved_submissions: approved,
        rejected_submissions: rejected,
        verified_payments: submissions.iter().filter(|s| s.payment_verified).count() as i64,
        total_messages: messages.len() as i64,
        open_messages: count_messages(messages, MessageStatus::Open),
        submission_trend: submission_trend(submissions, today),
        status_breakdown,
    }
}

pub fn admin_dashboard(
    submissions: &[(SubmissionStatus, bool)],
    messages: &[MessageStatus],
    total_users: i64,
) -> AdminDashboard {
    let total_submissions = submissions.len() as i64;
    let verified_payments = submissions.iter().filter(|(_, verified)| *verified).count() as i64;
    let total_messages = messages.len() as i64;
    let closed_messages = count_messages(messages, MessageStatus::Closed);

    AdminDashboard {
        total_submissions,
        verified_payments,
        pending_submissions: submissions
            .iter()
            .filter(|(status, _)| *status == SubmissionStatus::Pending)
            .count() as i64,
        total_messages,
        open_messages: count_messages(messages, MessageStatus::Open),
        closed_messages,
        total_users,
        payment_verification_rate: percentage(verified_payments, total_submissions),
        message_resolution_rate: percentage(closed_messages, total_messages),
        avg_submissions_per_user: average(total_submissions, total_users),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn stat(status: SubmissionStatus, verified: bool, y: i32, m: u32, d: u32) -> SubmissionStat {
        SubmissionStat {
            status,
            payment_verified: verified,
            created_at: Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_percentage_and_average() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(5, 0), 0);
        assert_eq!(average(7, 3), 2.3);
        assert_eq!(average(4, 0), 0.0);
    }

    #[test]
    fn test_trend_is_zero_filled_and_ordered() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let submissions = vec![
            stat(SubmissionStatus::Pending, false, 2024, 3, 9),
            stat(SubmissionStatus::Pending, false, 2024, 3, 9),
            stat(SubmissionStatus::Approved, true, 2024, 3, 4),
            stat(SubmissionStatus::Approved, true, 2024, 3, 2),
        ];

        let trend = submission_trend(&submissions, today);
        assert_eq!(trend.len(), 7);
        assert_eq!(trend[0].date, NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
        assert_eq!(trend[0].label, "Mar 3");
        assert_eq!(trend[1].submissions, 1);
        assert_eq!(trend[6].submissions, 2);
        assert_eq!(trend.iter().map(|d| d.submissions).sum::<i64>(), 3);
    }

    #[test]
    fn test_user_dashboard_breakdown_skips_zero() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let submissions = vec![
            stat(SubmissionStatus::Pending, false, 2024, 3, 9),
            stat(SubmissionStatus::Approved, true, 2024, 3, 8),
            stat(SubmissionStatus::Completed, true, 2024, 1, 8),
        ];
        let messages = vec![MessageStatus::Open, MessageStatus::Resolved];

        let dashboard = user_dashboard(&submissions, &messages, today);
        assert_eq!(dashboard.total_submissions, 3);
        assert_eq!(dashboard.pending_submissions, 1);
        assert_eq!(dashboard.approved_submissions, 1);
        assert_eq!(dashboard.rejected_submissions, 0);
        assert_eq!(dashboard.verified_payments, 2);
        assert_eq!(dashboard.total_messages, 2);
        assert_eq!(dashboard.open_messages, 1);
        assert_eq!(
            dashboard.status_breakdown,
            vec![
                StatusSlice { name: "Pending".to_string(), value: 1 },
                StatusSlice { name: "Approved".to_string(), value: 1 },
            ]
        );
    }

    #[test]
    fn test_admin_dashboard_rates() {
        let submissions = vec![
            (SubmissionStatus::Pending, false),
            (SubmissionStatus::Approved, true),
            (SubmissionStatus::Completed, true),
        ];
        let messages = vec![MessageStatus::Open, MessageStatus::Closed, MessageStatus::Closed];

        let dashboard = admin_dashboard(&submissions, &messages, 2);
        assert_eq!(dashboard.pending_submissions, 1);
        assert_eq!(dashboard.payment_verification_rate, 67);
        assert_eq!(dashboard.closed_messages, 2);
        assert_eq!(dashboard.message_resolution_rate, 67);
        assert_eq!(dashboard.avg_submissions_per_user, 1.5);
    }

    #[test]
    fn test_empty_admin_dashboard() {
        let dashboard = admin_dashboard(&[], &[], 0);
        assert_eq!(dashboard.payment_verification_rate, 0);
        assert_eq!(dashboard.message_resolution_rate, 0);
        assert_eq!(dashboard.avg_submissions_per_user, 0.0);
    }
}
