//! Reconciliation engine
//!
//! The core of the service: matching incoming spreadsheet rows against the
//! persisted user directory. Both reconcilers are pure, request-scoped
//! functions over an immutable [`DirectorySnapshot`] taken at batch start —
//! all row decisions are made against that fixed snapshot and the resulting
//! mutations are written at batch end, never re-reading mid-batch. Imports
//! are sequential and single-writer, so no cross-batch locking exists.

pub mod attendance;
pub mod roster;

pub use attendance::{reconcile_attendance, AttendanceOutcome, AttendanceRow, RowResolution};
pub use roster::{reconcile_roster, ConflictError, RosterOutcome, RosterRow};

use rollcall_common::db::User;
use std::collections::HashMap;

/// Immutable snapshot of the user directory, indexed by both matching keys.
///
/// Names are expected to be normalized already (they are stored normalized);
/// card codes match exactly, case-sensitive.
pub struct DirectorySnapshot {
    users: Vec<User>,
    by_name: HashMap<String, usize>,
    by_card: HashMap<String, usize>,
}

impl DirectorySnapshot {
    pub fn new(users: Vec<User>) -> Self {
        let mut by_name = HashMap::with_capacity(users.len());
        let mut by_card = HashMap::with_capacity(users.len());
        for (idx, user) in users.iter().enumerate() {
            by_name.insert(user.full_name_lowercase.clone(), idx);
            if let Some(code) = &user.card_code {
                by_card.insert(code.clone(), idx);
            }
        }
        Self { users, by_name, by_card }
    }

    pub fn lookup_by_name(&self, normalized_name: &str) -> Option<&User> {
        self.by_name.get(normalized_name).map(|&idx| &self.users[idx])
    }

    pub fn lookup_by_card_code(&self, card_code: &str) -> Option<&User> {
        self.by_card.get(card_code).map(|&idx| &self.users[idx])
    }

    pub fn contains_name(&self, normalized_name: &str) -> bool {
        self.by_name.contains_key(normalized_name)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
