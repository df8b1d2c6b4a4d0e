//! Attendance reconciliation
//!
//! Resolves each check-in row to a user and emits an attendance record, or
//! records the row as unmatched. Unlike roster reconciliation, a bad row
//! never fails the batch — at the row level, errors are data: unresolved
//! rows land in the blacklist/unmatched log and the batch carries on.
//!
//! Known accepted limitation: full names are not guaranteed unique, so a new
//! person sharing an existing person's exact normalized name is silently
//! attributed to the existing user. Documented behavior, kept as-is.

use rollcall_common::db::{AttendanceRecord, BlacklistEntry, BlacklistReason};
use rollcall_common::normalize_name;
use std::collections::HashSet;

use super::DirectorySnapshot;

/// One incoming check-in row from the spreadsheet exporter.
///
/// The exporter sends the card code when the scanned value looks like one
/// (`A001` shape) and the typed-in name otherwise; either field may be null.
#[derive(Debug, Clone)]
pub struct AttendanceRow {
    /// Check-in time, epoch milliseconds
    pub timestamp: i64,
    pub card_code: Option<String>,
    pub full_name: Option<String>,
}

/// Per-row resolution outcome. Deliberately a value, not an error: the two
/// channels (batch-level conflict vs row-level skip) must never share one
/// error mechanism.
#[derive(Debug)]
pub enum RowResolution {
    Resolved(AttendanceRecord),
    Unresolved(BlacklistEntry),
}

/// Result of reconciling one attendance batch
#[derive(Debug, Default)]
pub struct AttendanceOutcome {
    /// Records to append, one per resolved row
    pub records: Vec<AttendanceRecord>,
    /// Unmatched-log entries, one per unresolved row
    pub unmatched: Vec<BlacklistEntry>,
    /// Max timestamp among resolved rows; None when nothing resolved
    pub max_resolved_date: Option<i64>,
}

/// Resolve a single row against the directory snapshot.
///
/// Card code takes precedence when both fields are present; there is no
/// fallback from a missing card code to the name. For unresolved rows the
/// representative identity is the normalized name unless it is already
/// blacklisted, else the card code unless blacklisted, else empty — but the
/// row is recorded either way so the raw input stays available for retry
/// and debugging.
pub fn resolve_row(
    row: &AttendanceRow,
    directory: &DirectorySnapshot,
    blacklisted: &HashSet<String>,
) -> RowResolution {
    let matched = match (&row.card_code, &row.full_name) {
        (Some(code), _) => directory.lookup_by_card_code(code),
        (None, Some(name)) => directory.lookup_by_name(&normalize_name(name)),
        (None, None) => None,
    };

    if let Some(user) = matched {
        return RowResolution::Resolved(AttendanceRecord::new(row.timestamp, user));
    }

    let normalized_name = row.full_name.as_deref().map(normalize_name);
    let identity = match &normalized_name {
        Some(name) if !blacklisted.contains(name) => name.clone(),
        _ => match &row.card_code {
            Some(code) if !blacklisted.contains(code) => code.clone(),
            _ => String::new(),
        },
    };

    let mut entry = BlacklistEntry::new(identity, BlacklistReason::AttendanceNotMatchingToUser);
    entry.noted_at = Some(row.timestamp);
    entry.raw_card_code = row.card_code.clone();
    entry.raw_full_name = row.full_name.clone();
    RowResolution::Unresolved(entry)
}

/// Reconcile an attendance batch against the directory snapshot.
///
/// `blacklisted` is the blacklist filtered to reason
/// `ATTENDANCE_NOT_MATCHING_TO_USER`. Only resolved rows contribute to
/// `max_resolved_date`; an all-unresolved batch must leave the watermark
/// untouched, so the max is an Option rather than a sentinel.
pub fn reconcile_attendance(
    rows: &[AttendanceRow],
    directory: &DirectorySnapshot,
    blacklisted: &HashSet<String>,
) -> AttendanceOutcome {
    let mut outcome = AttendanceOutcome::default();

    for row in rows {
        match resolve_row(row, directory, blacklisted) {
            RowResolution::Resolved(record) => {
                outcome.max_resolved_date = Some(match outcome.max_resolved_date {
                    Some(max) => max.max(record.date),
                    None => record.date,
                });
                outcome.records.push(record);
            }
            RowResolution::Unresolved(entry) => {
                outcome.unmatched.push(entry);
            }
        }
    }

    outcome
}
