pub mod handlers;
pub mod logger;
pub mod models;

pub use handlers::*;
pub use logger::ActivityLogger;
pub use models::*;
