pub mod calculator;
pub mod handlers;
pub mod models;

pub use calculator::*;
pub use handlers::*;
pub use models::*;
