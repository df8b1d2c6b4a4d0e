//! Database models
//!
//! Identity is a first-class, visible field on every record (`id` plus the
//! payload fields) — no hidden bookkeeping bolted onto plain maps.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::{Error, Result};

/// A member of the user directory.
///
/// Keyed by `full_name_lowercase` (unique, normalized via
/// [`crate::normalize_name`]) and optionally by `card_code` (unique when
/// present). Insert-only: records are created on first sighting of a
/// non-conflicting roster name and never updated or deleted.
/// TODO: card-code changes for an existing name are not applied; needs an
/// explicit update path once the roster source can express them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Normalized full name, the matching key for attendance rows
    pub full_name_lowercase: String,
    /// Card code printed on the member's card, e.g. "A001" (one uppercase
    /// letter + three digits, assigned upstream and not validated here)
    pub card_code: Option<String>,
    /// Discipleship group tag from the roster, informational
    pub group_tag: Option<String>,
}

impl User {
    /// Create a new user record. `full_name_lowercase` must already be
    /// normalized by the caller.
    pub fn new(full_name_lowercase: String, card_code: Option<String>, group_tag: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name_lowercase,
            card_code,
            group_tag,
        }
    }
}

/// One check-in event. Immutable once created; the `attendance` table is an
/// append-only log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: Uuid,
    /// Check-in time, epoch milliseconds (as exported by the spreadsheet)
    pub date: i64,
    pub user_id: Uuid,
    /// Card code the user had when the record was created, informational
    pub card_code_at_time: Option<String>,
    /// Normalized name the user had when the record was created, informational
    pub full_name_at_time: Option<String>,
}

impl AttendanceRecord {
    pub fn new(date: i64, user: &User) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            user_id: user.id,
            card_code_at_time: user.card_code.clone(),
            full_name_at_time: Some(user.full_name_lowercase.clone()),
        }
    }
}

/// Why an identity is on the blacklist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlacklistReason {
    /// Two roster rows shared the same normalized name; a human must
    /// adjudicate before the name can be imported
    #[serde(rename = "DUPLICATE_FULLNAME_IN_USER_LIST")]
    DuplicateFullNameInUserList,
    /// An attendance row could not be resolved to any user
    #[serde(rename = "ATTENDANCE_NOT_MATCHING_TO_USER")]
    AttendanceNotMatchingToUser,
}

impl BlacklistReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlacklistReason::DuplicateFullNameInUserList => "DUPLICATE_FULLNAME_IN_USER_LIST",
            BlacklistReason::AttendanceNotMatchingToUser => "ATTENDANCE_NOT_MATCHING_TO_USER",
        }
    }
}

impl FromStr for BlacklistReason {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "DUPLICATE_FULLNAME_IN_USER_LIST" => Ok(BlacklistReason::DuplicateFullNameInUserList),
            "ATTENDANCE_NOT_MATCHING_TO_USER" => Ok(BlacklistReason::AttendanceNotMatchingToUser),
            other => Err(Error::InvalidInput(format!(
                "Unknown blacklist reason: {}",
                other
            ))),
        }
    }
}

/// One known-problem identity (a normalized name or a card code).
///
/// Append-only. Entries suppress repeat conflict flags across runs; for
/// unresolved attendance rows the original timestamp and raw row fields are
/// kept for later debugging and retry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlacklistEntry {
    pub id: Uuid,
    /// Normalized name or card code; may be empty when every candidate
    /// identity of the source row was already blacklisted
    pub identity: String,
    pub reason: BlacklistReason,
    /// Timestamp of the attendance row that produced this entry, epoch millis
    pub noted_at: Option<i64>,
    /// Raw card code of the source row, for debugging
    pub raw_card_code: Option<String>,
    /// Raw full name of the source row, for debugging
    pub raw_full_name: Option<String>,
}

impl BlacklistEntry {
    pub fn new(identity: String, reason: BlacklistReason) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity,
            reason,
            noted_at: None,
            raw_card_code: None,
            raw_full_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blacklist_reason_round_trips_through_str() {
        for reason in [
            BlacklistReason::DuplicateFullNameInUserList,
            BlacklistReason::AttendanceNotMatchingToUser,
        ] {
            assert_eq!(reason.as_str().parse::<BlacklistReason>().unwrap(), reason);
        }
    }

    #[test]
    fn unknown_reason_is_rejected() {
        assert!("SOMETHING_ELSE".parse::<BlacklistReason>().is_err());
    }

    #[test]
    fn attendance_record_carries_denormalized_user_fields() {
        let user = User::new("alice smith".to_string(), Some("A001".to_string()), None);
        let record = AttendanceRecord::new(1_700_000_000_000, &user);

        assert_eq!(record.user_id, user.id);
        assert_eq!(record.card_code_at_time.as_deref(), Some("A001"));
        assert_eq!(record.full_name_at_time.as_deref(), Some("alice smith"));
    }
}
