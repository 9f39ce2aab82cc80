// Submissions module
// Posting-service applications: intake with payment proof, review workflow and export

pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod status_machine;
pub mod storage;

pub use error::SubmissionError;
pub use handlers::*;
pub use models::*;
pub use repository::SubmissionRepository;
pub use service::{
    bulk_changes, review_activities, submission_export_row, SubmissionService,
    STALE_REVIEW, SUBMISSION_EXPORT_HEADERS,
};
pub use status_machine::StatusMachine;
pub use storage::{ProofStorage, ProofUpload, StoredProof, UPLOADS_ROUTE};
