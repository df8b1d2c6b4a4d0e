//! Blacklist persistence
//!
//! Append-only. Roster-reason entries are added by an operator after a
//! conflict; attendance-reason entries are appended automatically for every
//! unresolved row.

use rollcall_common::db::{BlacklistEntry, BlacklistReason};
use rollcall_common::Result;
use sqlx::SqlitePool;
use std::collections::HashSet;

/// Load the set of blacklisted identities for one reason (the batch-start
/// snapshot each reconciler consults)
pub async fn load_identities(
    pool: &SqlitePool,
    reason: BlacklistReason,
) -> Result<HashSet<String>> {
    let identities: Vec<String> =
        sqlx::query_scalar("SELECT identity FROM blacklist WHERE reason = ?")
            .bind(reason.as_str())
            .fetch_all(pool)
            .await?;
    Ok(identities.into_iter().collect())
}

/// Append blacklist entries
pub async fn append_entries(pool: &SqlitePool, entries: &[BlacklistEntry]) -> Result<()> {
    for entry in entries {
        sqlx::query(
            r#"
            INSERT INTO blacklist (id, identity, reason, noted_at, raw_card_code, raw_full_name)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(&entry.identity)
        .bind(entry.reason.as_str())
        .bind(entry.noted_at)
        .bind(&entry.raw_card_code)
        .bind(&entry.raw_full_name)
        .execute(pool)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_common::db::connect_memory;

    #[tokio::test]
    async fn load_filters_by_reason() {
        let pool = connect_memory().await.unwrap();

        let entries = vec![
            BlacklistEntry::new(
                "alice smith".to_string(),
                BlacklistReason::DuplicateFullNameInUserList,
            ),
            BlacklistEntry::new(
                "bob".to_string(),
                BlacklistReason::AttendanceNotMatchingToUser,
            ),
        ];
        append_entries(&pool, &entries).await.unwrap();

        let roster = load_identities(&pool, BlacklistReason::DuplicateFullNameInUserList)
            .await
            .unwrap();
        let expected: HashSet<String> = ["alice smith".to_string()].into();
        assert_eq!(roster, expected);

        let attendance = load_identities(&pool, BlacklistReason::AttendanceNotMatchingToUser)
            .await
            .unwrap();
        let expected: HashSet<String> = ["bob".to_string()].into();
        assert_eq!(attendance, expected);
    }

    #[tokio::test]
    async fn repeated_identity_is_appended_not_deduplicated() {
        // Unmatched attendance rows are logged every run, even for an
        // identity already present.
        let pool = connect_memory().await.unwrap();

        let mut first =
            BlacklistEntry::new("bob".to_string(), BlacklistReason::AttendanceNotMatchingToUser);
        first.noted_at = Some(100);
        let mut second =
            BlacklistEntry::new("bob".to_string(), BlacklistReason::AttendanceNotMatchingToUser);
        second.noted_at = Some(200);

        append_entries(&pool, &[first, second]).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blacklist WHERE identity = 'bob'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 2);

        // As a lookup set it still collapses to one identity
        let identities = load_identities(&pool, BlacklistReason::AttendanceNotMatchingToUser)
            .await
            .unwrap();
        assert_eq!(identities.len(), 1);
    }
}
