// Support messages: user inquiries and admin responses

pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use handlers::*;
pub use models::*;
pub use repository::SupportRepository;
pub use service::{message_export_row, SupportService, MESSAGE_EXPORT_HEADERS};
