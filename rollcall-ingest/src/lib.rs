//! rollcall-ingest library - roster and attendance ingest service
//!
//! Receives roster and attendance batches exported from the spreadsheet
//! side, reconciles them against the persisted user directory, and records
//! attendance events. Unmatched or ambiguous identities land on the
//! blacklist for manual review.

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod reconcile;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Service start time, for the health endpoint
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// The import endpoints are POST-only; axum answers 405 for other methods
/// on the same path.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/updateUsers", post(api::update_users))
        .route("/updateAttendance", post(api::update_attendance))
        .route(
            "/getLatestAttendanceEntryDate",
            get(api::get_latest_attendance_entry_date),
        )
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
