//! Roster update endpoint
//!
//! POST /updateUsers — consumes the roster array exported from the
//! membership spreadsheet and grows the user directory.

use axum::{body::Bytes, extract::State};
use serde::Deserialize;
use tracing::{info, warn};

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::reconcile::{reconcile_roster, DirectorySnapshot, RosterRow};
use crate::AppState;
use rollcall_common::db::BlacklistReason;

/// One roster row as sent by the spreadsheet exporter
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RosterRowDto {
    /// Card code, e.g. "A001"; may be empty when the member has no card yet
    #[serde(rename = "QR")]
    pub qr: String,
    pub name: String,
    pub congregation: String,
    pub dgroup: String,
}

impl From<RosterRowDto> for RosterRow {
    fn from(dto: RosterRowDto) -> Self {
        RosterRow {
            card_code: dto.qr,
            full_name: dto.name,
            congregation: Some(dto.congregation),
            group_tag: Some(dto.dgroup),
        }
    }
}

/// POST /updateUsers
///
/// Whole-batch semantics: a normalized-name collision aborts the batch with
/// zero inserts; otherwise every unseen name becomes a new user. Returns a
/// plain confirmation string on success.
pub async fn update_users(State(state): State<AppState>, body: Bytes) -> ApiResult<String> {
    // Schema validation at the boundary; reconciliation never sees a
    // malformed batch
    let dtos: Vec<RosterRowDto> = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))?;
    let rows: Vec<RosterRow> = dtos.into_iter().map(RosterRow::from).collect();

    // Invocation accounting must never fail the import
    if let Err(e) = db::config::record_invocation(&state.db, "updateUsers").await {
        warn!(error = %e, "Failed to record invocation");
    }

    // Batch-start snapshot: directory + roster-reason blacklist
    let directory = DirectorySnapshot::new(db::users::load_all_users(&state.db).await?);
    let blacklisted =
        db::blacklist::load_identities(&state.db, BlacklistReason::DuplicateFullNameInUserList)
            .await?;

    let outcome = reconcile_roster(&rows, &directory, &blacklisted)?;

    db::users::insert_users(&state.db, &outcome.inserted).await?;

    info!(
        received = rows.len(),
        inserted = outcome.inserted.len(),
        already_present = outcome.already_present,
        skipped_blacklisted = outcome.skipped_blacklisted,
        "Roster batch reconciled"
    );

    Ok(format!(
        "Users updated: {} inserted, {} already present, {} skipped (blacklisted)",
        outcome.inserted.len(),
        outcome.already_present,
        outcome.skipped_blacklisted
    ))
}
