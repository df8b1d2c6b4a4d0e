//! Attendance endpoints
//!
//! POST /updateAttendance — consumes check-in rows exported from the
//! attendance spreadsheet. GET /getLatestAttendanceEntryDate — tells the
//! exporter where to resume.

use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::reconcile::{reconcile_attendance, AttendanceRow, DirectorySnapshot};
use crate::AppState;
use rollcall_common::db::BlacklistReason;

/// One attendance row as sent by the spreadsheet exporter.
///
/// The exporter fills exactly one of `QRcode` / `fullnameLowercase`: the
/// scanned value when it matches the card-code shape, the typed name
/// otherwise. Neither is validated here.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttendanceRowDto {
    /// Epoch milliseconds
    pub timestamp: i64,
    #[serde(rename = "QRcode")]
    pub qr_code: Option<String>,
    #[serde(rename = "fullnameLowercase")]
    pub fullname_lowercase: Option<String>,
}

impl From<AttendanceRowDto> for AttendanceRow {
    fn from(dto: AttendanceRowDto) -> Self {
        AttendanceRow {
            timestamp: dto.timestamp,
            card_code: dto.qr_code,
            full_name: dto.fullname_lowercase,
        }
    }
}

/// GET /getLatestAttendanceEntryDate response
#[derive(Debug, Serialize)]
pub struct LatestAttendanceDateResponse {
    pub message: String,
    #[serde(rename = "latestAttendanceDate")]
    pub latest_attendance_date: i64,
}

/// POST /updateAttendance
///
/// Per-row semantics: resolved rows become attendance records, unresolved
/// rows are appended to the unmatched log, and the batch always succeeds
/// once validation passes. The watermark advances to the max timestamp among
/// resolved rows only.
pub async fn update_attendance(State(state): State<AppState>, body: Bytes) -> ApiResult<String> {
    let dtos: Vec<AttendanceRowDto> = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))?;
    let rows: Vec<AttendanceRow> = dtos.into_iter().map(AttendanceRow::from).collect();

    if let Err(e) = db::config::record_invocation(&state.db, "updateAttendance").await {
        warn!(error = %e, "Failed to record invocation");
    }

    // Batch-start snapshot: directory + attendance-reason blacklist
    let directory = DirectorySnapshot::new(db::users::load_all_users(&state.db).await?);
    let blacklisted =
        db::blacklist::load_identities(&state.db, BlacklistReason::AttendanceNotMatchingToUser)
            .await?;

    let outcome = reconcile_attendance(&rows, &directory, &blacklisted);

    // Row-level mutations persist even when other rows were unresolved
    db::attendance::insert_records(&state.db, &outcome.records).await?;
    db::blacklist::append_entries(&state.db, &outcome.unmatched).await?;

    // Guarded advance: an all-unresolved batch leaves the watermark alone
    if let Some(max_date) = outcome.max_resolved_date {
        db::settings::advance_latest_attendance_date(&state.db, max_date).await?;
    }

    info!(
        received = rows.len(),
        recorded = outcome.records.len(),
        unmatched = outcome.unmatched.len(),
        watermark = ?outcome.max_resolved_date,
        "Attendance batch reconciled"
    );

    Ok(format!(
        "Attendance updated: {} recorded, {} unmatched",
        outcome.records.len(),
        outcome.unmatched.len()
    ))
}

/// GET /getLatestAttendanceEntryDate
///
/// Max date over the persisted attendance log (a live query, not the cached
/// watermark), so the exporter knows where to resume extraction. Errors when
/// no attendance exists yet.
pub async fn get_latest_attendance_entry_date(
    State(state): State<AppState>,
) -> ApiResult<Json<LatestAttendanceDateResponse>> {
    let latest = db::attendance::latest_entry_date(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("No attendance records exist yet".to_string()))?;

    Ok(Json(LatestAttendanceDateResponse {
        message: "Latest attendance entry date".to_string(),
        latest_attendance_date: latest,
    }))
}
