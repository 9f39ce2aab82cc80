// Dashboard statistics for users and admins

pub mod aggregate;
pub mod handlers;
pub mod models;
pub mod repository;

pub use aggregate::{admin_dashboard, average, percentage, submission_trend, user_dashboard};
pub use handlers::*;
pub use models::*;
pub use repository::DashboardRepository;
