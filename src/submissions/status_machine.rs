use crate::submissions::SubmissionStatus;

/// Review workflow for submission statuses
pub struct StatusMachine;

impl StatusMachine {
    /// Check if a status transition is valid
    ///
    /// # Valid Transitions
    /// - Pending → InProgress, Approved, Rejected
    /// - InProgress → Pending, Approved, Rejected
    /// - Approved → InProgress, Completed
    /// - Rejected → Pending (resubmission review)
    /// - Completed → (terminal)
    /// - Any status → Same status (idempotent)
    pub fn is_valid_transition(from: SubmissionStatus, to: SubmissionStatus) -> bool {
        use SubmissionStatus::*;

        if from == to {
            return true;
        }

        matches!(
            (from, to),
            (Pending, InProgress)
                | (Pending, Approved)
                | (Pending, Rejected)
                | (InProgress, Pending)
                | (InProgress, Approved)
                | (InProgress, Rejected)
                | (Approved, InProgress)
                | (Approved, Completed)
                | (Rejected, Pending)
        )
    }

    /// Statuses reachable from `from`, excluding itself
    pub fn next_statuses(from: SubmissionStatus) -> Vec<SubmissionStatus> {
        SubmissionStatus::ALL
            .iter()
            .copied()
            .filter(|&to| to != from && Self::is_valid_transition(from, to))
            .collect()
    }

    /// Attempt to transition from one status to another
    pub fn transition(
        from: SubmissionStatus,
        to: SubmissionStatus,
    ) -> Result<SubmissionStatus, String> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(format!("Invalid status transition from {} to {}", from, to))
        }
    }
}
