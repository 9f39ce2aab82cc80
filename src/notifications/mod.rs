// Notifications module
// History, delivery preferences, alert counts and the live alert stream

pub mod alerts;
pub mod feed;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use alerts::AlertTracker;
pub use feed::{ChangeAction, ChangeEvent, ChangeFeed, ChangeTable};
pub use handlers::*;
pub use models::*;
pub use repository::NotificationRepository;
pub use service::{plan_admin_response, plan_submission_notifications, NotificationService};
