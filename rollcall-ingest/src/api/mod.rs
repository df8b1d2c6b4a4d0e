//! HTTP API handlers

pub mod attendance;
pub mod health;
pub mod users;

pub use attendance::{get_latest_attendance_entry_date, update_attendance};
pub use health::health_routes;
pub use users::update_users;
