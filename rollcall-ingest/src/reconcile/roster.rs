//! Roster reconciliation
//!
//! Computes which incoming roster rows become new users and which collide on
//! a normalized name. Ambiguity aborts the whole batch: an ambiguous roster
//! must not silently create wrong associations, so a human adjudicates by
//! blacklisting the name (reason `DUPLICATE_FULLNAME_IN_USER_LIST`) and
//! resubmitting.

use rollcall_common::db::User;
use rollcall_common::normalize_name;
use std::collections::HashSet;
use thiserror::Error;

use super::DirectorySnapshot;

/// One incoming roster row describing a person
#[derive(Debug, Clone)]
pub struct RosterRow {
    pub card_code: String,
    pub full_name: String,
    /// Congregation label from the roster; informational, currently unused
    pub congregation: Option<String>,
    pub group_tag: Option<String>,
}

/// Batch-level failure: the roster contained rows whose normalized names
/// collide. No users are inserted; the batch must be corrected externally
/// (typically by blacklisting the name) and resubmitted.
#[derive(Debug, Error)]
#[error("duplicate full names in roster batch: {}", identities.join(", "))]
pub struct ConflictError {
    /// All conflicting normalized names, in first-seen order
    pub identities: Vec<String>,
}

/// Result of a successful roster reconciliation
#[derive(Debug)]
pub struct RosterOutcome {
    /// New users to insert into the directory
    pub inserted: Vec<User>,
    /// Rows skipped because their name is blacklisted
    pub skipped_blacklisted: usize,
    /// Rows whose name was already in the directory (left untouched)
    pub already_present: usize,
}

/// Reconcile a roster batch against the directory snapshot.
///
/// `blacklisted_names` is the blacklist filtered to reason
/// `DUPLICATE_FULLNAME_IN_USER_LIST`; rows matching it are treated as
/// intentionally ignored and do not participate in conflict detection.
///
/// Existing users are never modified — insert-only is the current contract.
pub fn reconcile_roster(
    rows: &[RosterRow],
    directory: &DirectorySnapshot,
    blacklisted_names: &HashSet<String>,
) -> Result<RosterOutcome, ConflictError> {
    let mut seen_in_batch: HashSet<String> = HashSet::new();
    let mut conflicts: Vec<String> = Vec::new();
    let mut skipped_blacklisted = 0usize;

    // Pass 1: conflict detection over the whole batch. A repeated normalized
    // name is a conflict even when the name already exists in the directory.
    for row in rows {
        let name = normalize_name(&row.full_name);
        if blacklisted_names.contains(&name) {
            skipped_blacklisted += 1;
            continue;
        }
        if !seen_in_batch.insert(name.clone()) && !conflicts.contains(&name) {
            conflicts.push(name);
        }
    }

    if !conflicts.is_empty() {
        return Err(ConflictError { identities: conflicts });
    }

    // Pass 2: no conflicts — insert every unseen name. Names are unique
    // within the batch at this point, so no intra-batch dedup is needed.
    let mut inserted = Vec::new();
    let mut already_present = 0usize;
    for row in rows {
        let name = normalize_name(&row.full_name);
        if blacklisted_names.contains(&name) {
            continue;
        }
        if directory.contains_name(&name) {
            already_present += 1;
            continue;
        }
        let card_code = if row.card_code.is_empty() {
            None
        } else {
            Some(row.card_code.clone())
        };
        inserted.push(User::new(name, card_code, row.group_tag.clone()));
    }

    Ok(RosterOutcome {
        inserted,
        skipped_blacklisted,
        already_present,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(card: &str, name: &str) -> RosterRow {
        RosterRow {
            card_code: card.to_string(),
            full_name: name.to_string(),
            congregation: None,
            group_tag: None,
        }
    }

    fn directory_of(names: &[(&str, Option<&str>)]) -> DirectorySnapshot {
        DirectorySnapshot::new(
            names
                .iter()
                .map(|(name, card)| {
                    User::new(name.to_string(), card.map(str::to_string), None)
                })
                .collect(),
        )
    }

    #[test]
    fn clean_batch_inserts_one_user_per_unseen_name() {
        let directory = directory_of(&[("carol white", None)]);
        let outcome = reconcile_roster(
            &[
                row("A001", "Alice Smith"),
                row("B002", "Bob Jones"),
                row("C003", "Carol White"),
            ],
            &directory,
            &HashSet::new(),
        )
        .unwrap();

        assert_eq!(outcome.inserted.len(), 2);
        assert_eq!(outcome.inserted[0].full_name_lowercase, "alice smith");
        assert_eq!(outcome.inserted[0].card_code.as_deref(), Some("A001"));
        assert_eq!(outcome.inserted[1].full_name_lowercase, "bob jones");
        assert_eq!(outcome.already_present, 1);
        assert_eq!(outcome.skipped_blacklisted, 0);
    }

    #[test]
    fn duplicate_name_fails_whole_batch_with_zero_inserts() {
        let directory = directory_of(&[]);
        let err = reconcile_roster(
            &[
                row("A001", "Alice Smith"),
                row("B002", "Bob Jones"),
                row("A002", "alice smith "),
            ],
            &directory,
            &HashSet::new(),
        )
        .unwrap_err();

        assert_eq!(err.identities, vec!["alice smith".to_string()]);
    }

    #[test]
    fn conflict_names_all_colliding_identities() {
        let directory = directory_of(&[]);
        let err = reconcile_roster(
            &[
                row("A001", "Alice Smith"),
                row("A002", "Alice Smith"),
                row("B001", "Bob Jones"),
                row("B002", "Bob Jones"),
            ],
            &directory,
            &HashSet::new(),
        )
        .unwrap_err();

        assert_eq!(
            err.identities,
            vec!["alice smith".to_string(), "bob jones".to_string()]
        );
    }

    #[test]
    fn blacklisted_duplicate_is_silently_skipped() {
        let directory = directory_of(&[]);
        let blacklisted: HashSet<String> = ["alice smith".to_string()].into();

        let outcome = reconcile_roster(
            &[
                row("A001", "Alice Smith"),
                row("A002", "ALICE SMITH"),
                row("B002", "Bob Jones"),
            ],
            &directory,
            &blacklisted,
        )
        .unwrap();

        assert_eq!(outcome.skipped_blacklisted, 2);
        assert_eq!(outcome.inserted.len(), 1);
        assert_eq!(outcome.inserted[0].full_name_lowercase, "bob jones");
    }

    #[test]
    fn reimporting_existing_name_is_a_no_op() {
        let directory = directory_of(&[("alice smith", Some("A001"))]);
        let outcome =
            reconcile_roster(&[row("A001", "Alice Smith")], &directory, &HashSet::new()).unwrap();

        assert!(outcome.inserted.is_empty());
        assert_eq!(outcome.already_present, 1);
    }

    #[test]
    fn empty_card_code_stored_as_none() {
        let directory = directory_of(&[]);
        let outcome =
            reconcile_roster(&[row("", "Alice Smith")], &directory, &HashSet::new()).unwrap();

        assert_eq!(outcome.inserted[0].card_code, None);
    }

    #[test]
    fn duplicate_of_existing_directory_name_is_still_a_conflict() {
        // The same-batch repeat is what matters, not whether the directory
        // already knows the name.
        let directory = directory_of(&[("alice smith", None)]);
        let err = reconcile_roster(
            &[row("A001", "Alice Smith"), row("A002", "Alice Smith")],
            &directory,
            &HashSet::new(),
        )
        .unwrap_err();

        assert_eq!(err.identities, vec!["alice smith".to_string()]);
    }
}
